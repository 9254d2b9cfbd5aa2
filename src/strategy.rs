use crate::context::ValidationContext;
use crate::field::ErrorList;

/// Synthetic resource version stamped on both sides of an update so
/// optimistic-concurrency checks stay quiet.
pub const SYNTHETIC_RESOURCE_VERSION: &str = "1";

/// Validation entry points of one resource type.
///
/// Implementations read gates only from the context and must not depend on
/// any other external state.
pub trait ValidationStrategy {
    type Object: Clone;

    fn validate(&self, ctx: &ValidationContext<'_>, object: &Self::Object) -> ErrorList;

    fn validate_update(
        &self,
        ctx: &ValidationContext<'_>,
        object: &Self::Object,
        old: &Self::Object,
    ) -> ErrorList;
}

/// Objects that carry a resource version.
pub trait Versioned {
    fn resource_version(&self) -> &str;
    fn set_resource_version(&mut self, version: &str);
}

impl<S: ValidationStrategy + ?Sized> ValidationStrategy for &S {
    type Object = S::Object;

    fn validate(&self, ctx: &ValidationContext<'_>, object: &Self::Object) -> ErrorList {
        (**self).validate(ctx, object)
    }

    fn validate_update(
        &self,
        ctx: &ValidationContext<'_>,
        object: &Self::Object,
        old: &Self::Object,
    ) -> ErrorList {
        (**self).validate_update(ctx, object, old)
    }
}
