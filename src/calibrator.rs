//! 相机标定编排
//!
//! 逐帧检测角点，丢弃不完整的帧，至少要有一帧完整检测，
//! 否则在进入优化之前就报错。优化本身交给视觉后端。

use anyhow::bail;
use opencv::core::{Mat, Point2f, Point3f, Size, Vector};
use opencv::imgproc::{self, COLOR_BGR2GRAY};
use opencv::prelude::*;

use crate::board::BoardPattern;
use crate::config::DETECT_FLAGS;
use crate::vision::{CalibOptions, CalibrationResult, VisionTrait};

pub fn calibrate_from_frames<V: VisionTrait>(
    vision: &V,
    frames: &[Mat],
    pattern: BoardPattern,
    cell_size: f32,
    options: &CalibOptions,
) -> anyhow::Result<CalibrationResult> {
    let mut image_points = Vector::<Vector<Point2f>>::new();
    let mut image_size = Size::default();

    for (index, frame) in frames.iter().enumerate() {
        let mut gray = Mat::default();
        imgproc::cvt_color(frame, &mut gray, COLOR_BGR2GRAY, 0)?;
        image_size = gray.size()?;

        let detection = vision.detect_pattern(&gray, pattern, DETECT_FLAGS)?;
        if detection.complete {
            image_points.push(detection.corners);
        } else {
            log::debug!("frame {}: incomplete chessboard, discarded", index);
        }
    }

    if image_points.is_empty() {
        bail!("there is no set of complete chessboard points");
    }
    log::info!(
        "calibrating from {} of {} frames",
        image_points.len(),
        frames.len()
    );

    // 每帧使用同一份三维角点
    let object_points: Vector<Vector<Point3f>> =
        std::iter::repeat(pattern.object_points(cell_size))
            .take(image_points.len())
            .collect();

    vision.calibrate(&object_points, &image_points, image_size, options)
}

/// 标定报告，只打印一次
pub fn print_report(selected: usize, result: &CalibrationResult) {
    println!("## Camera Calibration Results");
    println!("* The number of selected images = {}", selected);
    println!("* RMS error = {}", result.rms);
    println!("* Camera matrix (K) = {}", result.camera.k);
    println!(
        "* Distortion coefficient (k1, k2, p1, p2, k3, ...) = {:?}",
        result.camera.dist_coeffs
    );
}
