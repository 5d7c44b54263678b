use anyhow::bail;
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio;

use super::VideoSourceTrait;

/// 视频文件帧源
pub struct VideoFileSource {
    capture: videoio::VideoCapture,
}

impl VideoFileSource {
    /// 打开失败直接报错，不会产生任何帧
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let capture = videoio::VideoCapture::from_file(path, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            bail!("cannot read the given input, {}", path);
        }
        log::info!("opened video source: {}", path);
        Ok(Self { capture })
    }
}

impl VideoSourceTrait for VideoFileSource {
    fn read(&mut self) -> anyhow::Result<Option<Mat>> {
        let mut frame = Mat::default();
        if self.capture.read(&mut frame)? && !frame.empty() {
            Ok(Some(frame))
        } else {
            Ok(None)
        }
    }
}
