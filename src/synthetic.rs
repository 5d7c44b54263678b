//! 测试用的合成数据与脚本化能力实现
//!
//! 纯 nalgebra 针孔投影产生真值对应点，脚本化的
//! 视觉/显示/帧源实现让编排逻辑不依赖真实图像就能测试。

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use anyhow::bail;
use nalgebra::{Matrix3, Rotation3, Vector3};
use opencv::core::{Mat, Point2f, Point3f, Scalar, Size, Vector, CV_8UC3};

use crate::board::BoardPattern;
use crate::display::DisplayTrait;
use crate::video::VideoSourceTrait;
use crate::vision::{
    CalibOptions, CalibrationResult, CameraParameters, ChessboardVision, Detection, Pose,
    VisionTrait,
};

/// 真值相机：fx=fy=800，主点 (640, 360)，无畸变
pub fn gt_camera() -> CameraParameters {
    CameraParameters {
        k: Matrix3::new(800.0, 0.0, 640.0, 0.0, 800.0, 360.0, 0.0, 0.0, 1.0),
        dist_coeffs: vec![0.0; 5],
    }
}

/// n 个确定性的位姿，旋转和深度都有变化，避免退化视角
pub fn ramp_poses(n: usize) -> Vec<Pose> {
    (0..n)
        .map(|i| {
            let a = i as f64;
            Pose {
                rvec: Vector3::new(-0.3 + 0.12 * a, 0.25 - 0.1 * a, 0.05 * a),
                tvec: Vector3::new(-0.11 + 0.01 * a, -0.08, 0.45 + 0.06 * a),
            }
        })
        .collect()
}

/// 针孔投影，无畸变
pub fn project_pinhole(
    points: &Vector<Point3f>,
    pose: &Pose,
    k: &Matrix3<f64>,
) -> Vector<Point2f> {
    let rotation = Rotation3::new(pose.rvec);
    points
        .iter()
        .map(|p| {
            let pc = rotation * Vector3::new(p.x as f64, p.y as f64, p.z as f64) + pose.tvec;
            let u = k[(0, 0)] * pc.x / pc.z + k[(0, 2)];
            let v = k[(1, 1)] * pc.y / pc.z + k[(1, 2)];
            Point2f::new(u as f32, v as f32)
        })
        .collect()
}

pub fn bgr_frame(width: i32, height: i32) -> Mat {
    Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::new(40.0, 40.0, 40.0, 0.0))
        .unwrap()
}

/// 完整检测：角点铺成像素网格，数量与标定板一致
pub fn complete_detection(pattern: BoardPattern) -> Detection {
    let mut corners = Vector::new();
    for r in 0..pattern.rows {
        for c in 0..pattern.cols {
            corners.push(Point2f::new(8.0 + 6.0 * c as f32, 8.0 + 6.0 * r as f32));
        }
    }
    Detection {
        complete: true,
        corners,
    }
}

/// 完整检测：第一个真值位姿下投影的标定板角点
pub fn projected_detection(pattern: BoardPattern, cell_size: f32, k: &Matrix3<f64>) -> Detection {
    let object_points = pattern.object_points(cell_size);
    Detection {
        complete: true,
        corners: project_pinhole(&object_points, &ramp_poses(1)[0], k),
    }
}

pub fn canned_result(k: Matrix3<f64>) -> CalibrationResult {
    CalibrationResult {
        rms: 0.5,
        camera: CameraParameters {
            k,
            dist_coeffs: vec![0.0; 5],
        },
        rvecs: Vec::new(),
        tvecs: Vec::new(),
    }
}

/// 脚本化视觉后端：检测结果按队列回放，标定返回预置结果并记录实参
#[derive(Default)]
pub struct ScriptedVision {
    detections: RefCell<VecDeque<Detection>>,
    result: RefCell<Option<CalibrationResult>>,
    pub pose: Pose,
    pub detect_calls: Cell<usize>,
    pub calibrate_views: Cell<Option<usize>>,
    pub object_set_lens: RefCell<Vec<usize>>,
    pub solve_calls: Cell<usize>,
    pub project_calls: Cell<usize>,
}

impl ScriptedVision {
    pub fn push_detection(&self, detection: Detection) {
        self.detections.borrow_mut().push_back(detection);
    }

    pub fn set_result(&self, result: CalibrationResult) {
        *self.result.borrow_mut() = Some(result);
    }
}

impl VisionTrait for ScriptedVision {
    fn detect_pattern(
        &self,
        _img: &Mat,
        _pattern: BoardPattern,
        _flags: i32,
    ) -> anyhow::Result<Detection> {
        self.detect_calls.set(self.detect_calls.get() + 1);
        Ok(self.detections.borrow_mut().pop_front().unwrap_or_default())
    }

    fn calibrate(
        &self,
        object_points: &Vector<Vector<Point3f>>,
        image_points: &Vector<Vector<Point2f>>,
        _image_size: Size,
        _options: &CalibOptions,
    ) -> anyhow::Result<CalibrationResult> {
        self.calibrate_views.set(Some(image_points.len()));
        *self.object_set_lens.borrow_mut() =
            object_points.iter().map(|set| set.len()).collect();
        match self.result.borrow().clone() {
            Some(result) => Ok(result),
            None => bail!("no scripted calibration result"),
        }
    }

    fn solve_pose(
        &self,
        _object_points: &Vector<Point3f>,
        _image_points: &Vector<Point2f>,
        _camera: &CameraParameters,
    ) -> anyhow::Result<Pose> {
        self.solve_calls.set(self.solve_calls.get() + 1);
        Ok(self.pose)
    }

    fn project(
        &self,
        object_points: &Vector<Point3f>,
        pose: &Pose,
        camera: &CameraParameters,
    ) -> anyhow::Result<Vector<Point2f>> {
        self.project_calls.set(self.project_calls.get() + 1);
        Ok(project_pinhole(object_points, pose, &camera.k))
    }
}

/// 半合成后端：检测按队列回放，其余委托给真实的 calib3d 后端
#[derive(Default)]
pub struct SyntheticRig {
    detections: RefCell<VecDeque<Detection>>,
    inner: ChessboardVision,
}

impl SyntheticRig {
    pub fn push_detection(&self, detection: Detection) {
        self.detections.borrow_mut().push_back(detection);
    }
}

impl VisionTrait for SyntheticRig {
    fn detect_pattern(
        &self,
        _img: &Mat,
        _pattern: BoardPattern,
        _flags: i32,
    ) -> anyhow::Result<Detection> {
        Ok(self.detections.borrow_mut().pop_front().unwrap_or_default())
    }

    fn calibrate(
        &self,
        object_points: &Vector<Vector<Point3f>>,
        image_points: &Vector<Vector<Point2f>>,
        image_size: Size,
        options: &CalibOptions,
    ) -> anyhow::Result<CalibrationResult> {
        self.inner
            .calibrate(object_points, image_points, image_size, options)
    }

    fn solve_pose(
        &self,
        object_points: &Vector<Point3f>,
        image_points: &Vector<Point2f>,
        camera: &CameraParameters,
    ) -> anyhow::Result<Pose> {
        self.inner.solve_pose(object_points, image_points, camera)
    }

    fn project(
        &self,
        object_points: &Vector<Point3f>,
        pose: &Pose,
        camera: &CameraParameters,
    ) -> anyhow::Result<Vector<Point2f>> {
        self.inner.project(object_points, pose, camera)
    }
}

/// 脚本化显示：按键按队列回放，超时返回 -1
#[derive(Default)]
pub struct ScriptedDisplay {
    keys: RefCell<VecDeque<i32>>,
    pub shown: Cell<usize>,
    pub waits: Cell<usize>,
}

impl ScriptedDisplay {
    pub fn with_keys(keys: &[i32]) -> Self {
        Self {
            keys: RefCell::new(keys.iter().copied().collect()),
            ..Default::default()
        }
    }
}

impl DisplayTrait for ScriptedDisplay {
    fn show(&mut self, _img: &Mat) -> anyhow::Result<()> {
        self.shown.set(self.shown.get() + 1);
        Ok(())
    }

    fn wait_key(&mut self, _delay_ms: i32) -> anyhow::Result<i32> {
        self.waits.set(self.waits.get() + 1);
        Ok(self.keys.borrow_mut().pop_front().unwrap_or(-1))
    }
}

/// 内存中的帧序列
#[derive(Default)]
pub struct MatListSource {
    frames: VecDeque<Mat>,
}

impl MatListSource {
    pub fn from_mats(frames: Vec<Mat>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl VideoSourceTrait for MatListSource {
    fn read(&mut self) -> anyhow::Result<Option<Mat>> {
        Ok(self.frames.pop_front())
    }
}
