//! 标定板几何：内角点网格与AR叠加用的立体框

use opencv::core::{Point3f, Size, Vector};

/// 标定板内角点网格 (列数, 行数)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPattern {
    pub cols: i32,
    pub rows: i32,
}

impl BoardPattern {
    pub fn size(&self) -> Size {
        Size::new(self.cols, self.rows)
    }

    pub fn corner_count(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    /// 角点的三维坐标，行优先排列，Z=0，按格子边长缩放。
    /// 每一帧都使用同一份坐标。
    pub fn object_points(&self, cell_size: f32) -> Vector<Point3f> {
        let mut points = Vector::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                points.push(Point3f::new(
                    c as f32 * cell_size,
                    r as f32 * cell_size,
                    0.0,
                ));
            }
        }
        points
    }
}

/// AR 框顶点，棋盘格坐标
const BOX_RING: [(f32, f32); 12] = [
    (2.0, 3.0),
    (3.0, 2.0),
    (4.0, 1.0),
    (5.0, 2.0),
    (6.0, 1.0),
    (7.0, 2.0),
    (8.0, 3.0),
    (7.0, 4.0),
    (6.0, 5.0),
    (5.0, 6.0),
    (4.0, 5.0),
    (3.0, 4.0),
];

/// 底环，贴在棋盘平面上
pub fn box_lower(cell_size: f32) -> Vector<Point3f> {
    BOX_RING
        .iter()
        .map(|&(x, y)| Point3f::new(x * cell_size, y * cell_size, 0.0))
        .collect()
}

/// 顶环，悬在棋盘上方一个格子的高度
pub fn box_upper(cell_size: f32) -> Vector<Point3f> {
    BOX_RING
        .iter()
        .map(|&(x, y)| Point3f::new(x * cell_size, y * cell_size, -cell_size))
        .collect()
}
