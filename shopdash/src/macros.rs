/// Combines several store signals into one signal of tuples.
///
/// Each argument must be a signal whose items are `Clone`. The combined signal
/// fires whenever any input changes and yields the latest value of every
/// input, in argument order. With a single argument the value itself is
/// yielded instead of a one-element tuple.
///
/// `futures_signals::map_ref` must be in scope at the call site.
///
/// ```ignore
/// let screen = combine_state_flow!(app_store.to_signal(), list_model.store().to_signal());
/// ```
#[macro_export]
macro_rules! combine_state_flow {
    ($($signal:expr),+ $(,)?) => {
        $crate::combine_state_flow!(@bind [] [] $($signal),+)
    };

    (@bind [$($bindings:tt)*] [$($names:ident)*] $signal:expr) => {
        $crate::combine_state_flow!(@emit
            [$($bindings)* let last = $signal,]
            [$($names)* last]
        )
    };

    (@bind [$($bindings:tt)*] [$($names:ident)*] $signal:expr, $($rest:expr),+) => {
        $crate::combine_state_flow!(@bind
            [$($bindings)* let next = $signal,]
            [$($names)* next]
            $($rest),+
        )
    };

    (@emit [$($bindings:tt)*] [$name:ident]) => {
        map_ref! {
            $($bindings)*
            =>
            $name.clone()
        }
    };

    (@emit [$($bindings:tt)*] [$($names:ident)+]) => {
        map_ref! {
            $($bindings)*
            =>
            ($($names.clone(),)+)
        }
    };
}
