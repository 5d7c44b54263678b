/// opencv
/// https://docs.rs/opencv/latest/opencv/all.html
///
/// nalgebra
/// https://docs.rs/nalgebra/latest/nalgebra/
///
extern crate opencv;

mod board;
mod calibrator;
mod cast;
mod config;
mod display;
mod renderer;
mod selector;
mod video;
mod vision;

#[cfg(test)]
mod synthetic;

use anyhow::ensure;

use crate::display::HighguiDisplay;
use crate::selector::SelectMode;
use crate::video::VideoFileSource;
use crate::vision::{CalibOptions, CameraParameters, ChessboardVision};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_nanos()
        .init();

    log::info!("input: {:?}", config::INPUT_FILE);
    let vision = ChessboardVision::default();

    let prior = match config::PRIOR_PARAMS_FILE {
        Some(path) => Some(CameraParameters::read_from_yaml(path)?),
        None => None,
    };
    let options = CalibOptions {
        prior,
        flags: config::CALIB_FLAGS,
    };

    // 选择标定帧，窗口和视频句柄在块结束时释放
    let selected = {
        let mut video = VideoFileSource::open(config::INPUT_FILE)?;
        let mut display = HighguiDisplay::new(config::SELECT_WINDOW)?;
        selector::select_frames(
            &mut video,
            &vision,
            &mut display,
            config::BOARD_PATTERN,
            SelectMode::Interactive,
            config::WAIT_MSEC,
        )?
    };
    ensure!(!selected.is_empty(), "there is no selected images");

    let result = calibrator::calibrate_from_frames(
        &vision,
        &selected,
        config::BOARD_PATTERN,
        config::BOARD_CELLSIZE,
        &options,
    )?;
    calibrator::print_report(selected.len(), &result);

    // 重新打开视频做位姿估计和AR叠加
    let mut video = VideoFileSource::open(config::INPUT_FILE)?;
    let mut display = HighguiDisplay::new(config::POSE_WINDOW)?;
    renderer::run_pose_loop(
        &mut video,
        &vision,
        &mut display,
        config::BOARD_PATTERN,
        config::BOARD_CELLSIZE,
        &result.camera,
        config::WAIT_MSEC,
    )?;

    Ok(())
}
