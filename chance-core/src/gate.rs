//! Probabilistic call gate.
//!
//! Building a gate is a two-stage affair. [`make_gate`] validates the
//! threshold and captures the default value; [`Gate::wrap`] attaches a target
//! callable and yields a [`Gated`] wrapper. Each [`Gated::call`] draws one
//! uniform integer in `[1, 98]`: when the threshold is strictly greater the
//! target runs and its result is returned untouched, otherwise the default is
//! returned and the target is not touched.
//!
//! ```
//! use chance_core::make_gate;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let gate = make_gate(50, 0_u32)?.with_rng(StdRng::seed_from_u64(7));
//! let mut add = gate.wrap(|a: u32, b: u32| a + b);
//! let out = add.call((2, 3));
//! assert!(out == 5 || out == 0);
//! # Ok::<(), chance_core::GateError>(())
//! ```
//!
//! Non-callables are rejected when they are wrapped:
//!
//! ```compile_fail
//! use chance_core::make_gate;
//!
//! let gate = make_gate(50, false).unwrap();
//! let _g = gate.wrap(1);
//! ```
//!
//! So are callables whose return type differs from the default's:
//!
//! ```compile_fail
//! use chance_core::make_gate;
//!
//! let gate = make_gate(50, false).unwrap();
//! let _g = gate.wrap(|| 1_u32);
//! ```

use crate::error::{GateError, Result};
use crate::probability::Probability;
use crate::types::{DRAW_MAX, DRAW_MIN};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::any::Any;
use std::fmt;
use tracing::{debug, trace};

/// Type-erased zero-argument target accepted by [`Gate::wrap_erased`].
pub type ErasedTarget<T> = Box<dyn FnMut() -> T>;

/// A callable that can be driven with its arguments packed into a tuple.
///
/// Implemented for every `FnMut` of arity 0 through 6, so `f(a, b)` becomes
/// `f.invoke((a, b))` and a nullary `f()` becomes `f.invoke(())`.
pub trait Invoke<Args> {
    /// Value returned by the callable.
    type Output;

    /// Call with the unpacked `args`.
    fn invoke(&mut self, args: Args) -> Self::Output;
}

macro_rules! impl_invoke {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> Invoke<($($arg,)*)> for Func
        where
            Func: FnMut($($arg),*) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn invoke(&mut self, ($($arg,)*): ($($arg,)*)) -> Out {
                self($($arg),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A1);
impl_invoke!(A1, A2);
impl_invoke!(A1, A2, A3);
impl_invoke!(A1, A2, A3, A4);
impl_invoke!(A1, A2, A3, A4, A5);
impl_invoke!(A1, A2, A3, A4, A5, A6);

/// Build a gate from a raw threshold and a default value.
///
/// Fails with [`GateError::InvalidArgument`] when `probability` is not an
/// integer in `[1, 99]`. The gate draws from the thread-local generator until
/// [`Gate::with_rng`] replaces it.
pub fn make_gate<P, T>(probability: P, default_value: T) -> Result<Gate<T>>
where
    P: TryInto<Probability, Error = GateError>,
{
    let probability = probability.try_into()?;
    debug!(probability = probability.get(), "gate constructed");
    Ok(Gate::new(probability, default_value))
}

/// Immutable gate configuration plus the generator that feeds its draws.
#[derive(Debug, Clone)]
pub struct Gate<T, R = ThreadRng> {
    probability: Probability,
    default_value: T,
    rng: R,
    name: Option<String>,
}

impl<T> Gate<T> {
    /// Gate over an already validated threshold, drawing from `ThreadRng`.
    pub fn new(probability: Probability, default_value: T) -> Self {
        Self { probability, default_value, rng: rand::thread_rng(), name: None }
    }
}

impl<T, R> Gate<T, R> {
    /// Replace the generator, e.g. with a seeded `StdRng` for reproducible runs.
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Gate<T, R2> {
        Gate { probability: self.probability, default_value: self.default_value, rng, name: self.name }
    }

    /// Label carried by every wrapper this gate produces.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Configured threshold.
    pub fn probability(&self) -> Probability {
        self.probability
    }

    /// Value returned when a draw fails.
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Label given through [`Gate::named`], if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Attach `target`, which must be callable with some argument tuple `Args`
    /// and return `T`. Each wrapper gets its own copy of the generator, so two
    /// wrappers made from one seeded gate decide identically.
    pub fn wrap<F, Args>(&self, target: F) -> Gated<F, T, R>
    where
        F: Invoke<Args, Output = T>,
        T: Clone,
        R: Clone,
    {
        debug!(probability = self.probability.get(), gate = self.name.as_deref(), "gate wrapped target");
        Gated {
            target,
            probability: self.probability,
            default_value: self.default_value.clone(),
            rng: self.rng.clone(),
            name: self.name.clone(),
        }
    }

    /// Attach a type-erased target.
    ///
    /// `target` must hold an [`ErasedTarget<T>`] or a `Box<dyn Fn() -> T>`;
    /// anything else fails with [`GateError::InvalidArgument`].
    pub fn wrap_erased(&self, target: Box<dyn Any>) -> Result<Gated<ErasedTarget<T>, T, R>>
    where
        T: Clone + 'static,
        R: Clone,
    {
        let target: ErasedTarget<T> = match target.downcast::<ErasedTarget<T>>() {
            Ok(f) => *f,
            Err(other) => match other.downcast::<Box<dyn Fn() -> T>>() {
                Ok(f) => {
                    let f = *f;
                    Box::new(move || f()) as ErasedTarget<T>
                }
                Err(_) => {
                    return Err(GateError::invalid_argument(format!(
                        "wrapped target is not callable as `FnMut() -> {}`",
                        std::any::type_name::<T>()
                    )))
                }
            },
        };
        Ok(self.wrap(target))
    }
}

/// A target guarded by a gate.
pub struct Gated<F, T, R = ThreadRng> {
    target: F,
    probability: Probability,
    default_value: T,
    rng: R,
    name: Option<String>,
}

impl<F, T, R> Gated<F, T, R> {
    /// Replace the label used on trace events.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Current label, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Threshold inherited from the gate.
    pub fn probability(&self) -> Probability {
        self.probability
    }

    /// Value returned when a draw fails.
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Give back the target.
    pub fn into_inner(self) -> F {
        self.target
    }

    /// Run the target with `args` if this call's draw passes, otherwise return
    /// the default. Errors produced by the target come back as its own output.
    pub fn call<Args>(&mut self, args: Args) -> T
    where
        F: Invoke<Args, Output = T>,
        T: Clone,
        R: Rng,
    {
        let draw = self.rng.gen_range(DRAW_MIN..=DRAW_MAX);
        let passed = self.probability.admits(draw);
        trace!(
            gate = self.name.as_deref(),
            probability = self.probability.get(),
            draw,
            passed,
            "gate decision"
        );
        if passed {
            self.target.invoke(args)
        } else {
            self.default_value.clone()
        }
    }
}

impl<F, T: fmt::Debug, R> fmt::Debug for Gated<F, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gated")
            .field("probability", &self.probability)
            .field("default_value", &self.default_value)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
