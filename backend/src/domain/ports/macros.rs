//! `define_port_error!`: declare a port error enum together with one
//! snake_case constructor per variant.

macro_rules! define_port_error {
    (
        $(#[$attr:meta])*
        pub enum $error:ident {
            $(
                $(#[$case_attr:meta])*
                $case:ident $( { $($arg:ident : $arg_ty:ty),* $(,)? } )? => $display:expr
            ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $error {
            $(
                $(#[$case_attr])*
                #[error($display)]
                $case $( { $($arg : $arg_ty),* } )?,
            )*
        }

        impl $error {
            $( define_port_error!(@constructor $case $( { $($arg : $arg_ty),* } )?); )*
        }
    };

    // Unit variants take no arguments.
    (@constructor $case:ident) => {
        ::paste::paste! {
            pub fn [<$case:snake>]() -> Self {
                Self::$case
            }
        }
    };

    (@constructor $case:ident { $($arg:ident : $arg_ty:ty),* $(,)? }) => {
        define_port_error!(@collect $case [] [] $( $arg : $arg_ty, )*);
    };

    // Fold each field into an `impl Into<T>` parameter and its initialiser.
    (@collect $case:ident [$($param:tt)*] [$($init:tt)*] $arg:ident : $arg_ty:ty, $($tail:tt)*) => {
        define_port_error!(
            @collect $case
            [$($param)* $arg: impl Into<$arg_ty>,]
            [$($init)* $arg: $arg.into(),]
            $($tail)*
        );
    };

    (@collect $case:ident [$($param:tt)*] [$($init:tt)*]) => {
        ::paste::paste! {
            pub fn [<$case:snake>]($($param)*) -> Self {
                Self::$case { $($init)* }
            }
        }
    };
}

pub(crate) use define_port_error;
