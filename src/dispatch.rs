//! Kernel selection.
//!
//! Each operation with specialized kernels has a kernel identifier type and a
//! pure selection function mapping the operand properties to the most
//! specific applicable kernel. The selection functions are generic over the
//! property dialect, so the 4x4 and 4x3 matrices share the same decision
//! ladders; a dialect that can never satisfy a predicate (a 4x3 matrix is
//! never a perspective projection) simply never reaches the corresponding
//! kernel. Every ladder ends in a kernel that is valid for any input.

use crate::properties::StructuralProperties;

/// Kernels for the product `left * right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MulKernel {
    /// `left` is the identity: the product is `right`.
    TakeRight,
    /// `right` is the identity: the product is `left`.
    TakeLeft,
    /// `left` is a translation and `right` is affine: the linear block of
    /// `right` is copied and the translations are added.
    TranslationAffine,
    /// Both are affine: only the upper 3x4 blocks are multiplied.
    AffineAffine,
    /// `left` is a centered perspective projection and `right` is affine:
    /// every entry is a one- or two-term product.
    PerspectiveAffine,
    /// Only `right` is affine: its fixed last row is not read.
    GenericAffine,
    /// Full product.
    Generic,
}

/// Kernels for the inverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvertKernel {
    /// The inverse of the identity is the identity.
    Identity,
    /// The translation is negated.
    Translation,
    /// The linear block is transposed and the translation rotated back.
    Orthonormal,
    /// Adjugate of the linear block, with the translation mapped through it.
    Affine,
    /// Closed form from the five structurally nonzero entries.
    Perspective,
    /// Full cofactor expansion.
    Generic,
}

/// Kernels for the transpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransposeKernel {
    /// The identity is symmetric.
    Identity,
    /// Full transpose.
    Generic,
}

/// Kernels for the normal matrix (inverse transpose of the linear block).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NormalKernel {
    /// The normal matrix of the identity is the identity.
    Identity,
    /// An orthonormal block is its own inverse transpose.
    Orthonormal,
    /// Cofactor matrix divided by the determinant.
    Cofactor,
}

/// Kernels for composing a matrix with an elementary factor (translation,
/// rotation, scaling, projection or view), on either side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FactorKernel {
    /// The matrix is the identity: the result is the factor itself, built by
    /// the matching constructor.
    Constructor,
    /// The matrix is a translation: only its translation interacts with the
    /// factor.
    Translation,
    /// The matrix is affine: its fixed last row is not read.
    Affine,
    /// The matrix is a centered perspective projection.
    Perspective,
    /// No structural knowledge.
    Generic,
}

/// Selects the kernel for the product `left * right`.
pub fn select_mul_kernel<P: StructuralProperties>(left: P, right: P) -> MulKernel {
    if left.is_identity() {
        MulKernel::TakeRight
    } else if right.is_identity() {
        MulKernel::TakeLeft
    } else if left.is_translation() && right.is_affine() {
        MulKernel::TranslationAffine
    } else if left.is_affine() && right.is_affine() {
        MulKernel::AffineAffine
    } else if left.is_perspective() && right.is_affine() {
        MulKernel::PerspectiveAffine
    } else if right.is_affine() {
        MulKernel::GenericAffine
    } else {
        MulKernel::Generic
    }
}

/// Selects the kernel for the inverse of a matrix with the given properties.
pub fn select_invert_kernel<P: StructuralProperties>(properties: P) -> InvertKernel {
    if properties.is_identity() {
        InvertKernel::Identity
    } else if properties.is_translation() {
        InvertKernel::Translation
    } else if properties.is_orthonormal() {
        InvertKernel::Orthonormal
    } else if properties.is_affine() {
        InvertKernel::Affine
    } else if properties.is_perspective() {
        InvertKernel::Perspective
    } else {
        InvertKernel::Generic
    }
}

/// Selects the kernel for the transpose of a matrix with the given
/// properties.
pub fn select_transpose_kernel<P: StructuralProperties>(properties: P) -> TransposeKernel {
    if properties.is_identity() {
        TransposeKernel::Identity
    } else {
        TransposeKernel::Generic
    }
}

/// Selects the kernel for the normal matrix of a matrix with the given
/// properties.
pub fn select_normal_kernel<P: StructuralProperties>(properties: P) -> NormalKernel {
    if properties.is_identity() {
        NormalKernel::Identity
    } else if properties.is_orthonormal() {
        NormalKernel::Orthonormal
    } else {
        NormalKernel::Cofactor
    }
}

/// Selects the kernel for composing a matrix with the given properties with
/// an elementary factor.
pub fn select_factor_kernel<P: StructuralProperties>(properties: P) -> FactorKernel {
    if properties.is_identity() {
        FactorKernel::Constructor
    } else if properties.is_translation() {
        FactorKernel::Translation
    } else if properties.is_affine() {
        FactorKernel::Affine
    } else if properties.is_perspective() {
        FactorKernel::Perspective
    } else {
        FactorKernel::Generic
    }
}
