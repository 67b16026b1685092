// src/render.rs - Overlay drawing onto caller-owned frames using tiny-skia
use image::RgbaImage;
use tiny_skia::{ColorU8, FillRule, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};
use crate::distance::DistanceResult;
use crate::landmarks::{Hand, PixelLandmark, HAND_CONNECTIONS};
use crate::projector::project;

pub type Rgba = [u8; 4];

pub const MAGENTA: Rgba = [255, 0, 255, 255];
pub const RED: Rgba = [255, 0, 0, 255];
const CONNECTION_COLOR: Rgba = [224, 224, 224, 255];
const JOINT_RADIUS: f32 = 3.0;
const CONNECTION_THICKNESS: f32 = 2.0;

/// Copy the frame into a pixmap, draw, and copy the result back. Frame bytes
/// are straight alpha while tiny-skia works premultiplied, so pixels are
/// converted on the way in and out.
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let Some(mut pixmap) = Pixmap::new(img.width(), img.height()) else {
        return;
    };

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    f(&mut pixmap);

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        dst.0 = [color.red(), color.green(), color.blue(), color.alpha()];
    }
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;
    paint
}

fn fill_circle(pixmap: &mut Pixmap, center: (i32, i32), radius: f32, color: Rgba) {
    if let Some(path) = PathBuilder::from_circle(center.0 as f32, center.1 as f32, radius) {
        pixmap.fill_path(&path, &paint(color), FillRule::Winding, Transform::identity(), None);
    }
}

fn stroke_line(pixmap: &mut Pixmap, from: (i32, i32), to: (i32, i32), width: f32, color: Rgba) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0 as f32, from.1 as f32);
    pb.line_to(to.0 as f32, to.1 as f32);
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
}

/// Draw the bone connections and joints of a detected hand.
pub fn draw_hand_skeleton(img: &mut RgbaImage, hand: &Hand) {
    let points = project(hand, img.width(), img.height());

    with_pixmap(img, |pixmap| {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            let (from, to) = (&points[a], &points[b]);
            stroke_line(pixmap, (from.x, from.y), (to.x, to.y), CONNECTION_THICKNESS, CONNECTION_COLOR);
        }
        for lm in &points {
            fill_circle(pixmap, (lm.x, lm.y), JOINT_RADIUS, RED);
        }
    });
}

pub fn draw_landmark_markers(img: &mut RgbaImage, landmarks: &[PixelLandmark], radius: f32) {
    if landmarks.is_empty() {
        return;
    }

    with_pixmap(img, |pixmap| {
        for lm in landmarks {
            fill_circle(pixmap, (lm.x, lm.y), radius, MAGENTA);
        }
    });
}

/// Connecting line, endpoint markers and a midpoint marker for a measured pair.
pub fn draw_distance(img: &mut RgbaImage, result: &DistanceResult, radius: f32, thickness: f32) {
    with_pixmap(img, |pixmap| {
        stroke_line(pixmap, result.p1, result.p2, thickness, MAGENTA);
        fill_circle(pixmap, result.p1, radius, MAGENTA);
        fill_circle(pixmap, result.p2, radius, MAGENTA);
        fill_circle(pixmap, result.midpoint, radius, RED);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba as Pixel;

    fn black(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Pixel([0, 0, 0, 255]))
    }

    #[test]
    fn test_markers_are_drawn() {
        let mut img = black(64, 64);
        draw_landmark_markers(&mut img, &[PixelLandmark::new(0, 32, 32)], 7.0);

        assert_eq!(img.get_pixel(32, 32).0, MAGENTA);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_translucent_frame_keeps_straight_alpha() {
        let background = [255, 255, 255, 128];
        let mut img = RgbaImage::from_pixel(64, 64, Pixel(background));
        draw_landmark_markers(&mut img, &[PixelLandmark::new(0, 32, 32)], 7.0);

        assert_eq!(img.get_pixel(32, 32).0, MAGENTA);
        assert_eq!(img.get_pixel(0, 0).0, background);

        // Along the row, every pixel is the background, the marker, or a
        // coverage blend of the two in straight alpha.
        for x in 0..64 {
            let [r, g, b, a] = img.get_pixel(x, 32).0;
            assert_eq!((r, b), (255, 255));
            assert!(a >= 128);

            let coverage = (a as f64 - 128.0) / 127.0;
            let expected_g = 128.0 * (1.0 - coverage) * 255.0 / a as f64;
            assert!(
                (g as f64 - expected_g).abs() <= 4.0,
                "pixel {} is {:?}, expected green near {:.1}",
                x,
                [r, g, b, a],
                expected_g
            );
        }
    }

    #[test]
    fn test_distance_overlay() {
        let mut img = black(100, 100);
        let result = DistanceResult {
            length: 60.0,
            p1: (20, 50),
            p2: (80, 50),
            midpoint: (50, 50),
        };
        draw_distance(&mut img, &result, 5.0, 3.0);

        assert_eq!(img.get_pixel(20, 50).0, MAGENTA);
        assert_eq!(img.get_pixel(80, 50).0, MAGENTA);
        assert_eq!(img.get_pixel(50, 50).0, RED);
        assert_eq!(img.get_pixel(35, 50).0, MAGENTA);
        assert_eq!(img.get_pixel(50, 10).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_skeleton_draws_joints() {
        use crate::landmarks::NormalizedLandmark;

        let hand = Hand::new(
            (0..21)
                .map(|i| NormalizedLandmark::new(0.1 + 0.04 * i as f64, 0.5))
                .collect(),
        )
        .unwrap();
        let mut img = black(200, 100);
        draw_hand_skeleton(&mut img, &hand);

        // Wrist sits at (20, 50).
        assert_eq!(img.get_pixel(20, 50).0, RED);
    }
}
