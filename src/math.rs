//! Linear algebra helpers on top of nalgebra

use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::types::QuadricCoefficients;

/// Homogeneous 4x4 matrix of a quadric
///
/// A point `p` lies on the surface when `[p, 1]ᵗ · A · [p, 1] = 0`.
pub fn quadric_matrix(q: &QuadricCoefficients) -> Matrix4<f64> {
    Matrix4::new(
        q.a, q.d, q.e, q.g, //
        q.d, q.b, q.f, q.h, //
        q.e, q.f, q.c, q.i, //
        q.g, q.h, q.i, -1.0,
    )
}

/// Eigen-decomposition of a symmetric 3x3 matrix, sorted by ascending eigenvalue
///
/// Returns the eigenvalues and a matrix whose columns are the matching
/// orthonormal eigenvectors. nalgebra leaves the order unspecified, so the
/// columns are permuted here to give callers a fixed axis convention.
pub fn symmetric_eigen_ascending(m: Matrix3<f64>) -> (Vector3<f64>, Matrix3<f64>) {
    let eigen = m.symmetric_eigen();

    let mut order = [0usize, 1, 2];
    order.sort_by(|&l, &r| eigen.eigenvalues[l].total_cmp(&eigen.eigenvalues[r]));

    let values = Vector3::new(
        eigen.eigenvalues[order[0]],
        eigen.eigenvalues[order[1]],
        eigen.eigenvalues[order[2]],
    );
    let vectors = Matrix3::from_columns(&[
        eigen.eigenvectors.column(order[0]).into_owned(),
        eigen.eigenvectors.column(order[1]).into_owned(),
        eigen.eigenvectors.column(order[2]).into_owned(),
    ]);

    (values, vectors)
}
