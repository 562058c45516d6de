macro_rules! impl_display {
    (for $ty:ty => $(|$selfty:pat_param|)? $fmt:literal $(, $($param:expr),+)? $(,)?) => {
        impl ::core::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                $(let $selfty = self;)?
                write!(f, $fmt, $($($param),*)?)
            }
        }
    };
}

pub(crate) use impl_display;
