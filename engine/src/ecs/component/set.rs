use crate::{
    all_tuples,
    ecs::{
        component::{Component, IntoSpec},
        types::{TypeId, TypeRegistry},
    },
};

/// Trait describing a target that can have component values applied to it from a `Set`.
pub trait Target {
    fn apply<C: Component>(&mut self, id: TypeId, value: C);
}

/// A set of component values attached to an entity in one call.
///
/// Sets are a single component value, a tuple of sets, or `()`. Values are applied in the order
/// they appear, so `(a, (b, c))` applies `a`, then `b`, then `c`.
pub trait Set: IntoSpec + Sized + 'static {
    /// The number of component values in the set, counting duplicates.
    const LEN: usize;

    /// Apply the component values in this set to the given target. This takes ownership of self.
    fn apply<T: Target>(self, registry: &TypeRegistry, target: &mut T);
}

impl<C: Component> Set for C {
    const LEN: usize = 1;

    fn apply<T: Target>(self, registry: &TypeRegistry, target: &mut T) {
        target.apply::<C>(registry.id::<C>(), self);
    }
}

impl Set for () {
    const LEN: usize = 0;

    fn apply<T: Target>(self, _registry: &TypeRegistry, _target: &mut T) {}
}

macro_rules! tuple_set {
    ($($name: ident),*) => {
        impl<$($name: Set),*> Set for ($($name,)*) {
            const LEN: usize = 0 $(+ <$name as Set>::LEN)*;

            fn apply<CT: Target>(self, registry: &TypeRegistry, target: &mut CT) {
                #[allow(non_snake_case)]
                let ( $($name,)* ) = self;
                $(<$name as Set>::apply($name, registry, target);)*
            }
        }
    }
}

all_tuples!(tuple_set);
