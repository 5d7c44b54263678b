//! 视觉能力接口
//!
//! 角点检测、标定、位姿求解、投影都走这个窄接口，
//! 编排逻辑可以用确定性的合成实现来测试。

mod chessboard;

pub use chessboard::ChessboardVision;

use anyhow::bail;
use nalgebra::{Matrix3, Vector3};
use opencv::core::{
    FileNodeTraitConst, FileStorage, FileStorageTraitConst, FileStorage_Mode, Mat, Point2f,
    Point3f, Size, Vector, CV_64F,
};
use opencv::prelude::*;

use crate::board::BoardPattern;
use crate::cast::Matrix3d;

/// 单帧角点检测结果。complete 为假时 corners 可能只有部分角点，
/// 只用于预览叠加，不参与标定。
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub complete: bool,
    pub corners: Vector<Point2f>,
}

/// 单帧外参，旋转为 Rodrigues 向量
#[derive(Debug, Clone, Copy, Default)]
pub struct Pose {
    pub rvec: Vector3<f64>,
    pub tvec: Vector3<f64>,
}

/// 内参矩阵和畸变系数
#[derive(Debug, Clone, Default)]
pub struct CameraParameters {
    pub k: Matrix3<f64>,
    pub dist_coeffs: Vec<f64>,
}

impl CameraParameters {
    pub fn k_mat(&self) -> Mat {
        Matrix3d(self.k).into()
    }

    pub fn dist_mat(&self) -> Mat {
        if self.dist_coeffs.is_empty() {
            return Mat::default();
        }
        let n = self.dist_coeffs.len() as i32;
        let mut mat = Mat::zeros_nd(&[1, n], CV_64F).unwrap().to_mat().unwrap();
        for (i, c) in self.dist_coeffs.iter().enumerate() {
            *mat.at_2d_mut::<f64>(0, i as i32).unwrap() = *c;
        }
        mat
    }

    /// 从 FileStorage YAML 读取先验参数
    pub fn read_from_yaml(path: &str) -> anyhow::Result<Self> {
        let fs = FileStorage::new(path, FileStorage_Mode::READ as i32, "utf-8")?;
        if !fs.is_opened()? {
            bail!("cannot open camera parameters file, {}", path);
        }

        let projection = fs.get("projection_parameters")?;
        let fx = projection.get("fx")?.to_f64()?;
        let fy = projection.get("fy")?.to_f64()?;
        let cx = projection.get("cx")?.to_f64()?;
        let cy = projection.get("cy")?.to_f64()?;

        let distortion = fs.get("distortion_parameters")?;
        let k1 = distortion.get("k1")?.to_f64()?;
        let k2 = distortion.get("k2")?.to_f64()?;
        let p1 = distortion.get("p1")?.to_f64()?;
        let p2 = distortion.get("p2")?.to_f64()?;

        Ok(Self {
            k: Matrix3::new(fx, 0.0, cx, 0.0, fy, cy, 0.0, 0.0, 1.0),
            dist_coeffs: vec![k1, k2, p1, p2],
        })
    }
}

/// calibrateCamera 的可选约束，先验和标志原样透传
#[derive(Debug, Clone, Default)]
pub struct CalibOptions {
    pub prior: Option<CameraParameters>,
    pub flags: i32,
}

/// 标定输出：RMS 重投影误差、内参、每帧外参
#[derive(Debug, Clone)]
pub struct CalibrationResult {
    pub rms: f64,
    pub camera: CameraParameters,
    pub rvecs: Vec<Vector3<f64>>,
    pub tvecs: Vec<Vector3<f64>>,
}

pub trait VisionTrait {
    /// 检测标定板角点
    fn detect_pattern(
        &self,
        img: &Mat,
        pattern: BoardPattern,
        flags: i32,
    ) -> anyhow::Result<Detection>;

    /// 非线性标定优化，object_points 与 image_points 一一对应
    fn calibrate(
        &self,
        object_points: &Vector<Vector<Point3f>>,
        image_points: &Vector<Vector<Point2f>>,
        image_size: Size,
        options: &CalibOptions,
    ) -> anyhow::Result<CalibrationResult>;

    /// 单帧位姿求解
    fn solve_pose(
        &self,
        object_points: &Vector<Point3f>,
        image_points: &Vector<Point2f>,
        camera: &CameraParameters,
    ) -> anyhow::Result<Pose>;

    /// 三维点投影到图像坐标
    fn project(
        &self,
        object_points: &Vector<Point3f>,
        pose: &Pose,
        camera: &CameraParameters,
    ) -> anyhow::Result<Vector<Point2f>>;
}
