//! Mat 与 nalgebra 类型的互相转换
//!
//! calibrateCamera / solvePnP 的输出是 [Mat]，
//! 这里统一转成 nalgebra 类型参与后续计算和打印。

use nalgebra::{Matrix3, Vector3};
use opencv::core::{Mat, CV_64F};
use opencv::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct Matrix3d(pub Matrix3<f64>);

/// 将 3x3 [Mat] 转换为 [Matrix3]
impl From<Mat> for Matrix3d {
    fn from(mat: Mat) -> Self {
        let rows = mat.rows();
        let cols = mat.cols();
        assert!(rows == 3 && cols == 3);
        let mut matrix = Matrix3::<f64>::zeros();
        for i in 0..3 {
            for j in 0..3 {
                matrix[(i, j)] = *mat.at_2d::<f64>(i as i32, j as i32).unwrap();
            }
        }
        Matrix3d(matrix)
    }
}

impl Into<Mat> for Matrix3d {
    fn into(self) -> Mat {
        let mut mat = Mat::zeros_nd(&[3, 3], CV_64F).unwrap().to_mat().unwrap();
        for i in 0..3 {
            for j in 0..3 {
                *mat.at_2d_mut::<f64>(i as i32, j as i32).unwrap() = self.0[(i, j)];
            }
        }
        mat
    }
}

#[derive(Debug, Clone, Default)]
pub struct Vector3d(pub Vector3<f64>);

/// 将 3x1 [Mat] 转换为 [Vector3]
impl From<Mat> for Vector3d {
    fn from(mat: Mat) -> Self {
        let rows = mat.rows();
        let cols = mat.cols();
        assert!(rows == 3 && cols == 1);
        let mut vector = Vector3::<f64>::zeros();
        for i in 0..3 {
            vector[i] = *mat.at_2d::<f64>(i as i32, 0).unwrap();
        }
        Vector3d(vector)
    }
}

impl Into<Mat> for Vector3d {
    fn into(self) -> Mat {
        let mut mat = Mat::zeros_nd(&[3, 1], CV_64F).unwrap().to_mat().unwrap();
        for i in 0..3 {
            *mat.at_2d_mut::<f64>(i as i32, 0).unwrap() = self.0[i];
        }
        mat
    }
}

/// 将单通道 f64 [Mat] 按行展开成 [Vec]，畸变系数的形状随后端变化，这里不做假设
pub fn flatten_f64(mat: &Mat) -> Vec<f64> {
    let mut out = Vec::with_capacity((mat.rows() * mat.cols()).max(0) as usize);
    for i in 0..mat.rows() {
        for j in 0..mat.cols() {
            out.push(*mat.at_2d::<f64>(i, j).unwrap());
        }
    }
    out
}

#[test]
fn test_mat_to_matrix() {
    let mat = Mat::from_slice_2d(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
    let matrix = Matrix3d::from(mat);
    assert_eq!(matrix.0, Matrix3::identity());

    let matrix = Matrix3d(Matrix3::identity());
    let mat: Mat = matrix.into();
    assert_eq!(*mat.at_2d::<f64>(1, 1).unwrap(), 1.0);
    assert_eq!(*mat.at_2d::<f64>(2, 1).unwrap(), 0.0);
}

#[test]
fn test_mat_to_vector() {
    let mat = Mat::from_slice_2d(&[[1.0], [2.0], [3.0]]).unwrap();
    let vector = Vector3d::from(mat);
    assert_eq!(vector.0, Vector3::new(1.0, 2.0, 3.0));

    let vector = Vector3d(Vector3::new(1.0, 0.0, 0.0));
    let mat: Mat = vector.into();
    assert_eq!(*mat.at_2d::<f64>(0, 0).unwrap(), 1.0);
}

#[test]
fn test_flatten() {
    let mat = Mat::from_slice_2d(&[[1.0, 2.0, 3.0, 4.0, 5.0]]).unwrap();
    assert_eq!(flatten_f64(&mat), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
}
