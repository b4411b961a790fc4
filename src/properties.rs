//! Structural properties cached by the matrix types.
//!
//! Every matrix carries a small set of flags classifying which algebraic
//! subclass its current entries belong to. The flags are conservative: each
//! set flag is guaranteed to hold for the entries, while a property that
//! happens to hold may be left unset. Operations read the flags to pick
//! cheaper kernels and derive the flags of their result from the flags of
//! their operands.
//!
//! The properties form a containment chain
//! `IDENTITY ⊂ TRANSLATION ⊂ ORTHONORMAL ⊂ AFFINE`, with `PERSPECTIVE`
//! outside of it. A flag set is *closed* when every set flag also has all the
//! weaker flags of the chain set. All flag sets produced by the library are
//! closed, which makes [`StructuralProperties::meet`] a plain intersection.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use std::fmt;

bitflags! {
    /// Structural properties of a [`Matrix4`](crate::matrix4::Matrix4).
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Zeroable, Pod)]
    pub struct Matrix4Properties: u8 {
        /// Only `m00`, `m11`, `m22`, `m23` and `m32` may be nonzero, the
        /// shape of a centered perspective projection.
        const PERSPECTIVE = 1 << 0;
        /// The last row is `(0, 0, 0, 1)`.
        const AFFINE      = 1 << 1;
        /// The upper-left 3x3 block is orthonormal. Implies `AFFINE`.
        const ORTHONORMAL = 1 << 2;
        /// The upper-left 3x3 block is the identity. Implies `ORTHONORMAL`.
        const TRANSLATION = 1 << 3;
        /// The matrix is the identity. Implies `TRANSLATION`.
        const IDENTITY    = 1 << 4;
    }
}

bitflags! {
    /// Structural properties of a [`Matrix4x3`](crate::matrix4x3::Matrix4x3).
    ///
    /// A 4x3 matrix has an implicit last row of `(0, 0, 0, 1)`, so it is
    /// always affine and has no flag for it.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Zeroable, Pod)]
    pub struct Matrix4x3Properties: u8 {
        /// The 3x3 block is orthonormal.
        const ORTHONORMAL = 1 << 0;
        /// The 3x3 block is the identity. Implies `ORTHONORMAL`.
        const TRANSLATION = 1 << 1;
        /// The matrix is the identity. Implies `TRANSLATION`.
        const IDENTITY    = 1 << 2;
    }
}

/// The most specific class of transforms a set of properties places a matrix
/// in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransformClass {
    /// No structural knowledge.
    General,
    /// Centered perspective projection shape.
    Perspective,
    /// Affine transform.
    Affine,
    /// Rotation, possibly with reflection, and translation.
    Orthonormal,
    /// Pure translation.
    Translation,
    /// The identity transform.
    Identity,
}

/// Lattice operations and predicates shared by the property types of all
/// matrix dialects. The kernel selection functions in
/// [`dispatch`](crate::dispatch) are written against this trait only.
pub trait StructuralProperties: Copy + Eq + fmt::Debug {
    /// The closed set of properties of every matrix in the given class.
    fn of_class(class: TransformClass) -> Self;

    /// The most specific class implied by the set flags.
    fn class(self) -> TransformClass;

    /// Whether the matrix is flagged as the identity.
    fn is_identity(self) -> bool;

    /// Whether the matrix is flagged as a pure translation.
    fn is_translation(self) -> bool;

    /// Whether the matrix is flagged as having an orthonormal 3x3 block.
    fn is_orthonormal(self) -> bool;

    /// Whether the matrix is flagged as affine.
    fn is_affine(self) -> bool;

    /// Whether the matrix is flagged as a centered perspective projection.
    fn is_perspective(self) -> bool;

    /// The properties shared by both sets.
    fn meet(self, other: Self) -> Self;

    /// Removes the property that characterizes the given class along with
    /// every stronger property of the chain.
    fn weaken(self, lost: TransformClass) -> Self;

    /// Adds the weaker properties implied by the set flags.
    fn closed(self) -> Self;
}

impl Matrix4Properties {
    /// The properties of the identity matrix.
    pub const fn identity() -> Self {
        Self::AFFINE
            .union(Self::ORTHONORMAL)
            .union(Self::TRANSLATION)
            .union(Self::IDENTITY)
    }

    /// The properties of a pure translation.
    pub const fn translation() -> Self {
        Self::AFFINE
            .union(Self::ORTHONORMAL)
            .union(Self::TRANSLATION)
    }

    /// The properties of a rotation (with optional translation).
    pub const fn orthonormal() -> Self {
        Self::AFFINE.union(Self::ORTHONORMAL)
    }

    /// The properties of a general affine transform.
    pub const fn affine() -> Self {
        Self::AFFINE
    }

    /// The properties of a centered perspective projection.
    pub const fn perspective() -> Self {
        Self::PERSPECTIVE
    }

    /// Converts to the 4x3 dialect, dropping the flags that are implicit
    /// there. Only meaningful for affine matrices.
    pub const fn to_matrix4x3_properties(self) -> Matrix4x3Properties {
        let mut properties = Matrix4x3Properties::empty();
        if self.contains(Self::ORTHONORMAL) {
            properties = properties.union(Matrix4x3Properties::ORTHONORMAL);
        }
        if self.contains(Self::TRANSLATION) {
            properties = properties.union(Matrix4x3Properties::TRANSLATION);
        }
        if self.contains(Self::IDENTITY) {
            properties = properties.union(Matrix4x3Properties::IDENTITY);
        }
        properties
    }
}

impl Matrix4x3Properties {
    /// The properties of the identity matrix.
    pub const fn identity() -> Self {
        Self::ORTHONORMAL
            .union(Self::TRANSLATION)
            .union(Self::IDENTITY)
    }

    /// The properties of a pure translation.
    pub const fn translation() -> Self {
        Self::ORTHONORMAL.union(Self::TRANSLATION)
    }

    /// The properties of a rotation (with optional translation).
    pub const fn orthonormal() -> Self {
        Self::ORTHONORMAL
    }

    /// Converts to the 4x4 dialect, where affinity is explicit.
    pub const fn to_matrix4_properties(self) -> Matrix4Properties {
        let mut properties = Matrix4Properties::AFFINE;
        if self.contains(Self::ORTHONORMAL) {
            properties = properties.union(Matrix4Properties::ORTHONORMAL);
        }
        if self.contains(Self::TRANSLATION) {
            properties = properties.union(Matrix4Properties::TRANSLATION);
        }
        if self.contains(Self::IDENTITY) {
            properties = properties.union(Matrix4Properties::IDENTITY);
        }
        properties
    }
}

impl StructuralProperties for Matrix4Properties {
    fn of_class(class: TransformClass) -> Self {
        match class {
            TransformClass::General => Self::empty(),
            TransformClass::Perspective => Self::perspective(),
            TransformClass::Affine => Self::affine(),
            TransformClass::Orthonormal => Self::orthonormal(),
            TransformClass::Translation => Self::translation(),
            TransformClass::Identity => Self::identity(),
        }
    }

    fn class(self) -> TransformClass {
        if self.contains(Self::IDENTITY) {
            TransformClass::Identity
        } else if self.contains(Self::TRANSLATION) {
            TransformClass::Translation
        } else if self.contains(Self::ORTHONORMAL) {
            TransformClass::Orthonormal
        } else if self.contains(Self::AFFINE) {
            TransformClass::Affine
        } else if self.contains(Self::PERSPECTIVE) {
            TransformClass::Perspective
        } else {
            TransformClass::General
        }
    }

    #[inline]
    fn is_identity(self) -> bool {
        self.contains(Self::IDENTITY)
    }

    #[inline]
    fn is_translation(self) -> bool {
        self.contains(Self::TRANSLATION)
    }

    #[inline]
    fn is_orthonormal(self) -> bool {
        self.contains(Self::ORTHONORMAL)
    }

    #[inline]
    fn is_affine(self) -> bool {
        self.contains(Self::AFFINE)
    }

    #[inline]
    fn is_perspective(self) -> bool {
        self.contains(Self::PERSPECTIVE)
    }

    #[inline]
    fn meet(self, other: Self) -> Self {
        self.intersection(other)
    }

    #[inline]
    fn weaken(self, lost: TransformClass) -> Self {
        let removed = match lost {
            TransformClass::General => Self::empty(),
            TransformClass::Perspective => Self::PERSPECTIVE,
            TransformClass::Affine => Self::identity(),
            TransformClass::Orthonormal => Self::IDENTITY | Self::TRANSLATION | Self::ORTHONORMAL,
            TransformClass::Translation => Self::IDENTITY | Self::TRANSLATION,
            TransformClass::Identity => Self::IDENTITY,
        };
        self.difference(removed)
    }

    #[inline]
    fn closed(self) -> Self {
        let mut closed = self;
        if closed.contains(Self::IDENTITY) {
            closed |= Self::TRANSLATION;
        }
        if closed.contains(Self::TRANSLATION) {
            closed |= Self::ORTHONORMAL;
        }
        if closed.contains(Self::ORTHONORMAL) {
            closed |= Self::AFFINE;
        }
        closed
    }
}

impl StructuralProperties for Matrix4x3Properties {
    fn of_class(class: TransformClass) -> Self {
        match class {
            TransformClass::General | TransformClass::Perspective | TransformClass::Affine => {
                Self::empty()
            }
            TransformClass::Orthonormal => Self::orthonormal(),
            TransformClass::Translation => Self::translation(),
            TransformClass::Identity => Self::identity(),
        }
    }

    fn class(self) -> TransformClass {
        if self.contains(Self::IDENTITY) {
            TransformClass::Identity
        } else if self.contains(Self::TRANSLATION) {
            TransformClass::Translation
        } else if self.contains(Self::ORTHONORMAL) {
            TransformClass::Orthonormal
        } else {
            TransformClass::Affine
        }
    }

    #[inline]
    fn is_identity(self) -> bool {
        self.contains(Self::IDENTITY)
    }

    #[inline]
    fn is_translation(self) -> bool {
        self.contains(Self::TRANSLATION)
    }

    #[inline]
    fn is_orthonormal(self) -> bool {
        self.contains(Self::ORTHONORMAL)
    }

    #[inline]
    fn is_affine(self) -> bool {
        true
    }

    #[inline]
    fn is_perspective(self) -> bool {
        false
    }

    #[inline]
    fn meet(self, other: Self) -> Self {
        self.intersection(other)
    }

    #[inline]
    fn weaken(self, lost: TransformClass) -> Self {
        let removed = match lost {
            TransformClass::General | TransformClass::Perspective => Self::empty(),
            TransformClass::Affine | TransformClass::Orthonormal => Self::all(),
            TransformClass::Translation => Self::IDENTITY | Self::TRANSLATION,
            TransformClass::Identity => Self::IDENTITY,
        };
        self.difference(removed)
    }

    #[inline]
    fn closed(self) -> Self {
        let mut closed = self;
        if closed.contains(Self::IDENTITY) {
            closed |= Self::TRANSLATION;
        }
        if closed.contains(Self::TRANSLATION) {
            closed |= Self::ORTHONORMAL;
        }
        closed
    }
}

impl fmt::Display for TransformClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::General => "general",
            Self::Perspective => "perspective",
            Self::Affine => "affine",
            Self::Orthonormal => "orthonormal",
            Self::Translation => "translation",
            Self::Identity => "identity",
        };
        f.write_str(name)
    }
}
