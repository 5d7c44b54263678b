//! 位姿估计与AR叠加
//!
//! 每帧独立检测、求解，不做时间平滑；检测失败的帧原样显示，
//! 不重试也不报错。

use opencv::core::{Mat, Point, Point2f, Scalar, Vector};
use opencv::imgproc::{self, LINE_8};

use crate::board::{self, BoardPattern};
use crate::config::{KEY_ESC, KEY_SPACE, POSE_DETECT_FLAGS};
use crate::display::DisplayTrait;
use crate::video::VideoSourceTrait;
use crate::vision::{CameraParameters, VisionTrait};

pub fn run_pose_loop<S, V, D>(
    video: &mut S,
    vision: &V,
    display: &mut D,
    pattern: BoardPattern,
    cell_size: f32,
    camera: &CameraParameters,
    wait_msec: i32,
) -> anyhow::Result<()>
where
    S: VideoSourceTrait,
    V: VisionTrait,
    D: DisplayTrait,
{
    let box_lower = board::box_lower(cell_size);
    let box_upper = board::box_upper(cell_size);
    let object_points = pattern.object_points(cell_size);

    while let Some(mut frame) = video.read()? {
        let detection = vision.detect_pattern(&frame, pattern, POSE_DETECT_FLAGS)?;
        if detection.complete {
            let pose = vision.solve_pose(&object_points, &detection.corners, camera)?;

            let line_lower = vision.project(&box_lower, &pose, camera)?;
            let line_upper = vision.project(&box_upper, &pose, camera)?;
            draw_ring(&mut frame, &line_lower, Scalar::new(255.0, 0.0, 0.0, 0.0))?;
            draw_ring(&mut frame, &line_upper, Scalar::new(0.0, 0.0, 255.0, 0.0))?;
        }

        display.show(&frame)?;
        let mut key = display.wait_key(wait_msec)?;
        if key == KEY_SPACE {
            key = display.wait_key(0)?;
        }
        if key == KEY_ESC {
            break;
        }
    }

    log::info!("pose estimation loop finished");
    Ok(())
}

/// 闭合折线
fn draw_ring(img: &mut Mat, ring: &Vector<Point2f>, color: Scalar) -> anyhow::Result<()> {
    let mut curves = Vector::<Vector<Point>>::new();
    curves.push(
        ring.iter()
            .map(|p| Point::new(p.x as i32, p.y as i32))
            .collect(),
    );
    imgproc::polylines(img, &curves, true, color, 2, LINE_8, 0)?;
    Ok(())
}
