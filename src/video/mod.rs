//! 视频帧来源
//!
//! 帧选择和位姿估计各自独占一个视频句柄，循环退出时随 Drop 释放。

mod file;

pub use file::VideoFileSource;

use opencv::core::Mat;

pub trait VideoSourceTrait {
    /// 读取下一帧，流结束返回 None
    fn read(&mut self) -> anyhow::Result<Option<Mat>>;
}
