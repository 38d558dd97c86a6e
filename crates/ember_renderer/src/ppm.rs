//! ASCII PPM ("P3") image output.

use crate::renderer::{color_to_rgb8, ImageBuffer, ToneMapping};
use std::io::{self, Write};

/// Write the image as ASCII PPM to `sink`.
///
/// Emits the `P3` header, the image dimensions and the maximum channel
/// value, then one `r g b` triple per line, scanning left-to-right and
/// top-to-bottom.
pub fn write_ppm<W: Write>(image: &ImageBuffer, tone: ToneMapping, sink: &mut W) -> io::Result<()> {
    writeln!(sink, "P3")?;
    writeln!(sink, "{} {}", image.width, image.height)?;
    writeln!(sink, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b] = color_to_rgb8(image.get(x, y), tone);
            writeln!(sink, "{} {} {}", r, g, b)?;
        }
    }

    sink.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_write_ppm_format() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::new(1.0, 0.0, 0.0));
        image.set(1, 0, Color::new(0.0, 1.0, 0.0));
        image.set(0, 1, Color::new(0.0, 0.0, 1.0));
        image.set(1, 1, Color::new(0.5, 0.5, 0.5));

        let mut out = Vec::new();
        write_ppm(&image, ToneMapping::Linear, &mut out).unwrap();

        let expected = "\
P3
2 2
255
255 0 0
0 255 0
0 0 255
127 127 127
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_write_ppm_propagates_sink_errors() {
        struct FailingSink;

        impl Write for FailingSink {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let image = ImageBuffer::new(1, 1);
        let err = write_ppm(&image, ToneMapping::Linear, &mut FailingSink)
            .expect_err("writes must fail");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
