/// Element types accepted as flow mask values.
///
/// Booleans are taken as they are. Numeric values must be exactly 0 or 1.
pub trait MaskElement: Copy + std::fmt::Debug {
    /// Converts the value to a mask flag, or `None` if it is neither 0 nor 1.
    fn to_mask(self) -> Option<bool>;
}

impl MaskElement for bool {
    fn to_mask(self) -> Option<bool> {
        Some(self)
    }
}

macro_rules! impl_mask_element {
    ($($t:ty),*) => {
        $(
            impl MaskElement for $t {
                fn to_mask(self) -> Option<bool> {
                    if self == 1 as $t {
                        Some(true)
                    } else if self == 0 as $t {
                        Some(false)
                    } else {
                        None
                    }
                }
            }
        )*
    };
}

impl_mask_element!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);
