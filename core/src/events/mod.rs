mod classifier;
mod event;


pub use classifier::{apply_offset, classify};
pub use event::{
    ActivationEvent, BreakbarDamageEvent, BuffApplyEvent, BuffExtensionEvent, BuffRemoveEvent,
    DamageEvent, DamageKind, Event, MovementEvent, StatusEvent, StatusKind,
};
