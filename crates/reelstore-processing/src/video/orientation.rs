use reelstore_core::models::Orientation;

/// Relative deviation from a canonical ratio still accepted as a match.
///
/// 1% absorbs encoder rounding such as 1920x1081 or 854x480.
const RATIO_TOLERANCE: f64 = 0.01;

const LANDSCAPE: f64 = 16.0 / 9.0;
const PORTRAIT: f64 = 9.0 / 16.0;

fn near(ratio: f64, canonical: f64) -> bool {
    ((ratio - canonical) / canonical).abs() <= RATIO_TOLERANCE
}

/// Classify frame geometry: 16:9 is landscape, 9:16 is portrait, anything
/// else (including degenerate zero sizes) is other.
pub fn classify(width: u32, height: u32) -> Orientation {
    if width == 0 || height == 0 {
        return Orientation::Other;
    }

    let ratio = width as f64 / height as f64;
    if near(ratio, LANDSCAPE) {
        Orientation::Landscape
    } else if near(ratio, PORTRAIT) {
        Orientation::Portrait
    } else {
        Orientation::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_sizes() {
        assert_eq!(classify(1920, 1080), Orientation::Landscape);
        assert_eq!(classify(1080, 1920), Orientation::Portrait);
        assert_eq!(classify(1000, 1000), Orientation::Other);
    }

    #[test]
    fn test_common_resolutions() {
        for (w, h) in [(3840, 2160), (1280, 720), (854, 480), (640, 360), (426, 240)] {
            assert_eq!(classify(w, h), Orientation::Landscape, "{}x{}", w, h);
            assert_eq!(classify(h, w), Orientation::Portrait, "{}x{}", h, w);
        }
    }

    #[test]
    fn test_one_pixel_perturbation() {
        for (w, h) in [(1920, 1080), (1280, 720)] {
            for (dw, dh) in [(1i64, 0i64), (-1, 0), (0, 1), (0, -1)] {
                let pw = (w as i64 + dw) as u32;
                let ph = (h as i64 + dh) as u32;
                assert_eq!(classify(pw, ph), Orientation::Landscape, "{}x{}", pw, ph);
                assert_eq!(classify(ph, pw), Orientation::Portrait, "{}x{}", ph, pw);
            }
        }
    }

    #[test]
    fn test_other_ratios() {
        assert_eq!(classify(1440, 1080), Orientation::Other); // 4:3
        assert_eq!(classify(2560, 1080), Orientation::Other); // 21:9
        assert_eq!(classify(1080, 1350), Orientation::Other); // 4:5
        assert_eq!(classify(0, 1080), Orientation::Other);
        assert_eq!(classify(1920, 0), Orientation::Other);
    }
}
