//! 显示窗口与按键事件
//!
//! 阻塞的 wait_key 是整个程序唯一的挂起点，也是唯一的取消点。

use opencv::core::Mat;
use opencv::highgui;

pub trait DisplayTrait {
    fn show(&mut self, img: &Mat) -> anyhow::Result<()>;
    /// 等待按键，delay_ms 为 0 时一直阻塞；超时没有按键返回 -1
    fn wait_key(&mut self, delay_ms: i32) -> anyhow::Result<i32>;
}

/// highgui 命名窗口
pub struct HighguiDisplay {
    window: String,
}

impl HighguiDisplay {
    pub fn new(window: &str) -> anyhow::Result<Self> {
        highgui::named_window(window, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            window: window.to_string(),
        })
    }
}

impl DisplayTrait for HighguiDisplay {
    fn show(&mut self, img: &Mat) -> anyhow::Result<()> {
        highgui::imshow(&self.window, img)?;
        Ok(())
    }

    fn wait_key(&mut self, delay_ms: i32) -> anyhow::Result<i32> {
        Ok(highgui::wait_key(delay_ms)?)
    }
}

impl Drop for HighguiDisplay {
    fn drop(&mut self) {
        let _ = highgui::destroy_window(&self.window);
    }
}
