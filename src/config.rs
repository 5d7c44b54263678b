use opencv::calib3d::{
    CALIB_CB_ADAPTIVE_THRESH, CALIB_CB_FAST_CHECK, CALIB_CB_NORMALIZE_IMAGE,
};

use crate::board::BoardPattern;

/// 标定视频路径
pub const INPUT_FILE: &str = "data/chessboard.mp4";
/// 标定板内角点网格
pub const BOARD_PATTERN: BoardPattern = BoardPattern { cols: 10, rows: 7 };
/// 格子边长，单位米
pub const BOARD_CELLSIZE: f32 = 0.025;

/// 播放时每帧等待的毫秒数
pub const WAIT_MSEC: i32 = 10;

pub const KEY_ESC: i32 = 27;
pub const KEY_SPACE: i32 = b' ' as i32;
pub const KEY_ENTER: i32 = b'\r' as i32;

/// 标定阶段的角点检测标志
pub const DETECT_FLAGS: i32 = CALIB_CB_ADAPTIVE_THRESH + CALIB_CB_NORMALIZE_IMAGE;
/// 位姿估计阶段加 FAST_CHECK，检测失败的帧尽快放弃
pub const POSE_DETECT_FLAGS: i32 =
    CALIB_CB_ADAPTIVE_THRESH + CALIB_CB_NORMALIZE_IMAGE + CALIB_CB_FAST_CHECK;

/// calibrateCamera 的标志，使用先验内参时需要配合 CALIB_USE_INTRINSIC_GUESS
pub const CALIB_FLAGS: i32 = 0;

/// 可选的相机参数先验文件（FileStorage YAML）
pub const PRIOR_PARAMS_FILE: Option<&str> = None;

pub const SELECT_WINDOW: &str = "Camera Calibration";
pub const POSE_WINDOW: &str = "Pose Estimation (Chessboard)";
