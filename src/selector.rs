//! 帧选择
//!
//! 自动模式收下每一帧；交互模式下空格暂停并预览角点，
//! 回车收下当前帧，ESC 结束选择（已收下的帧保留）。

use opencv::calib3d;
use opencv::core::{Mat, Point, Scalar};
use opencv::imgproc;

use crate::board::BoardPattern;
use crate::config::{DETECT_FLAGS, KEY_ENTER, KEY_ESC, KEY_SPACE};
use crate::display::DisplayTrait;
use crate::video::VideoSourceTrait;
use crate::vision::VisionTrait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// 无条件收下所有帧
    All,
    /// 按键选择
    Interactive,
}

pub fn select_frames<S, V, D>(
    video: &mut S,
    vision: &V,
    display: &mut D,
    pattern: BoardPattern,
    mode: SelectMode,
    wait_msec: i32,
) -> anyhow::Result<Vec<Mat>>
where
    S: VideoSourceTrait,
    V: VisionTrait,
    D: DisplayTrait,
{
    let mut selected = Vec::new();

    while let Some(frame) = video.read()? {
        if mode == SelectMode::All {
            selected.push(frame);
            continue;
        }

        // 叠加已选帧数后显示
        let mut preview = frame.clone();
        imgproc::put_text(
            &mut preview,
            &format!("NSelect: {}", selected.len()),
            Point::new(10, 25),
            imgproc::FONT_HERSHEY_DUPLEX,
            0.6,
            Scalar::new(0.0, 255.0, 0.0, 0.0),
            1,
            imgproc::LINE_8,
            false,
        )?;
        display.show(&preview)?;

        let key = display.wait_key(wait_msec)?;
        if key == KEY_ESC {
            break;
        }
        if key == KEY_SPACE {
            // 暂停，检测当前帧并叠加角点
            let detection = vision.detect_pattern(&frame, pattern, DETECT_FLAGS)?;
            calib3d::draw_chessboard_corners(
                &mut preview,
                pattern.size(),
                &detection.corners,
                detection.complete,
            )?;
            display.show(&preview)?;

            let key = display.wait_key(0)?;
            if key == KEY_ESC {
                break;
            }
            if key == KEY_ENTER {
                selected.push(frame);
            }
        }
    }

    log::info!("selected {} frames", selected.len());
    Ok(selected)
}
