//! Animated GIF encoder.

use gif::{DisposalMethod, Encoder, Frame, Repeat};

use crate::bean::PixelBean;
use crate::error::EncodeError;

/// Encodes `bean` as an infinitely-looping GIF89a stream.
///
/// Per-frame delay is `max(2, round(speed_ms / 10))` centiseconds (GIF's
/// native unit, floored at 2 per the format's practical minimum). Each
/// frame is quantized independently if it has more than 256 distinct
/// colors; a source with &le;256 colors per frame loses nothing.
pub fn encode_gif(bean: &PixelBean) -> Result<Vec<u8>, EncodeError> {
    if bean.total_frames() == 0 {
        return Err(EncodeError::EmptyInput);
    }

    let width = bean.width();
    let height = bean.height();
    let delay_cs = gif_delay_centiseconds(bean.speed_ms());

    let mut out = Vec::new();
    {
        let mut encoder =
            Encoder::new(&mut out, width as u16, height as u16, &[]).map_err(to_encode_error)?;
        encoder.set_repeat(Repeat::Infinite).map_err(to_encode_error)?;

        for rgb in bean.frames() {
            let mut owned = rgb.clone();
            let mut frame = Frame::from_rgb_speed(width as u16, height as u16, &mut owned, 10);
            frame.delay = delay_cs;
            frame.dispose = DisposalMethod::Background;
            encoder.write_frame(&frame).map_err(to_encode_error)?;
        }
    }

    Ok(out)
}

fn to_encode_error(e: gif::EncodingError) -> EncodeError {
    EncodeError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

fn gif_delay_centiseconds(speed_ms: u32) -> u16 {
    let cs = (f64::from(speed_ms) / 10.0).round() as u32;
    cs.max(2) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_floors_at_two_centiseconds() {
        assert_eq!(gif_delay_centiseconds(10), 2);
        assert_eq!(gif_delay_centiseconds(15), 2);
    }

    #[test]
    fn delay_rounds_to_nearest_centisecond() {
        assert_eq!(gif_delay_centiseconds(100), 10);
        assert_eq!(gif_delay_centiseconds(250), 25);
    }

    #[test]
    fn encodes_a_valid_gif_header() {
        let bean = PixelBean::new(1, 1, 100, vec![vec![0u8; 16 * 16 * 3]]);
        let bytes = encode_gif(&bean).unwrap();
        assert_eq!(&bytes[0..6], b"GIF89a");
    }

}
