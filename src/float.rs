//! Floating point conversions that enable switching
//! between f64 and f32 as the primary float type.

#[cfg(not(feature = "single_precision"))]
pub use self::double::*;
#[cfg(feature = "single_precision")]
pub use self::single::*;

pub trait ToFloat {
    fn to_float(self) -> Float;
}

#[cfg(not(feature = "single_precision"))]
mod double {
    pub type Float = f64;
    use super::*;

    impl ToFloat for f32 {
        fn to_float(self) -> Float {
            self.into()
        }
    }

    impl ToFloat for f64 {
        fn to_float(self) -> Float {
            self
        }
    }
}

#[cfg(feature = "single_precision")]
mod single {
    pub type Float = f32;
    use super::*;

    impl ToFloat for f32 {
        fn to_float(self) -> Float {
            self
        }
    }

    impl ToFloat for f64 {
        fn to_float(self) -> Float {
            self as Float
        }
    }
}

impl ToFloat for u8 {
    fn to_float(self) -> Float {
        self.into()
    }
}

impl ToFloat for u32 {
    #[allow(clippy::cast_lossless)]
    fn to_float(self) -> Float {
        self as Float
    }
}

impl ToFloat for i32 {
    #[allow(clippy::cast_lossless)]
    fn to_float(self) -> Float {
        self as Float
    }
}

impl ToFloat for usize {
    fn to_float(self) -> Float {
        self as Float
    }
}
