use bitflags::bitflags;

bitflags! {
    /// Movement state bits carried in a `MovementBlock` (spec.md §4.4).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MovementFlags: u32 {
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const STRAFE_LEFT = 1 << 2;
        const STRAFE_RIGHT = 1 << 3;
        const TURN_LEFT = 1 << 4;
        const TURN_RIGHT = 1 << 5;
        const SWIMMING = 1 << 6;
        const FALLING = 1 << 7;
    }
}

impl Default for MovementFlags {
    fn default() -> Self {
        MovementFlags::empty()
    }
}
