//! OpenCV calib3d 后端

use anyhow::Context;
use opencv::calib3d;
use opencv::core::{Mat, Point2f, Point3f, Size, TermCriteria, Vector};

use super::{CalibOptions, CalibrationResult, CameraParameters, Detection, Pose, VisionTrait};
use crate::board::BoardPattern;
use crate::cast::{flatten_f64, Matrix3d, Vector3d};

#[derive(Debug, Default)]
pub struct ChessboardVision;

impl VisionTrait for ChessboardVision {
    fn detect_pattern(
        &self,
        img: &Mat,
        pattern: BoardPattern,
        flags: i32,
    ) -> anyhow::Result<Detection> {
        let mut corners = Vector::<Point2f>::new();
        let complete =
            calib3d::find_chessboard_corners(img, pattern.size(), &mut corners, flags)?;
        Ok(Detection { complete, corners })
    }

    fn calibrate(
        &self,
        object_points: &Vector<Vector<Point3f>>,
        image_points: &Vector<Vector<Point2f>>,
        image_size: Size,
        options: &CalibOptions,
    ) -> anyhow::Result<CalibrationResult> {
        let mut camera_matrix = match &options.prior {
            Some(prior) => prior.k_mat(),
            None => Mat::default(),
        };
        let mut dist_coeffs = match &options.prior {
            Some(prior) => prior.dist_mat(),
            None => Mat::default(),
        };
        let mut rvecs = Vector::<Mat>::new();
        let mut tvecs = Vector::<Mat>::new();

        let rms = calib3d::calibrate_camera(
            object_points,
            image_points,
            image_size,
            &mut camera_matrix,
            &mut dist_coeffs,
            &mut rvecs,
            &mut tvecs,
            options.flags,
            TermCriteria::default()?,
        )
        .context("calibrate_camera failed")?;

        Ok(CalibrationResult {
            rms,
            camera: CameraParameters {
                k: Matrix3d::from(camera_matrix).0,
                dist_coeffs: flatten_f64(&dist_coeffs),
            },
            rvecs: rvecs.iter().map(|m| Vector3d::from(m).0).collect(),
            tvecs: tvecs.iter().map(|m| Vector3d::from(m).0).collect(),
        })
    }

    fn solve_pose(
        &self,
        object_points: &Vector<Point3f>,
        image_points: &Vector<Point2f>,
        camera: &CameraParameters,
    ) -> anyhow::Result<Pose> {
        let mut rvec = Mat::default();
        let mut tvec = Mat::default();
        let converged = calib3d::solve_pnp(
            object_points,
            image_points,
            &camera.k_mat(),
            &camera.dist_mat(),
            &mut rvec,
            &mut tvec,
            false,
            calib3d::SOLVEPNP_ITERATIVE,
        )?;
        if !converged {
            log::debug!("solve_pnp did not converge");
        }
        Ok(Pose {
            rvec: Vector3d::from(rvec).0,
            tvec: Vector3d::from(tvec).0,
        })
    }

    fn project(
        &self,
        object_points: &Vector<Point3f>,
        pose: &Pose,
        camera: &CameraParameters,
    ) -> anyhow::Result<Vector<Point2f>> {
        let rvec: Mat = Vector3d(pose.rvec).into();
        let tvec: Mat = Vector3d(pose.tvec).into();
        let mut image_points = Vector::<Point2f>::new();
        let mut jacobian = Mat::default();
        calib3d::project_points(
            object_points,
            &rvec,
            &tvec,
            &camera.k_mat(),
            &camera.dist_mat(),
            &mut image_points,
            &mut jacobian,
            0.0,
        )?;
        Ok(image_points)
    }
}
