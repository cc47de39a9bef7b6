//! Reversible byte transforms
//!
//! Each action maps a byte to a byte and has an inverse. The law
//! `inverse(a, transform(a, x)) == x` must hold for every action and every
//! byte; the step evaluator checks it on every step and [`verify`] checks it
//! exhaustively.

use serde::Serialize;

use crate::types::{Action, ActionSet};

/// Mask used by the `xor` action
pub const XOR_MASK: u8 = 0x55;

/// Offset used by the `add` and `sub` actions
pub const SHIFT: u8 = 10;

/// A family of byte transforms with inverses, keyed by action
pub trait TransformSet {
    fn transform(&self, action: Action, x: u8) -> u8;
    fn inverse(&self, action: Action, y: u8) -> u8;
}

/// The standard transforms: xor with a mask, add and subtract modulo 256
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteTransforms;

impl TransformSet for ByteTransforms {
    fn transform(&self, action: Action, x: u8) -> u8 {
        transform(action, x)
    }

    fn inverse(&self, action: Action, y: u8) -> u8 {
        inverse(action, y)
    }
}

/// Apply an action to a byte
pub fn transform(action: Action, x: u8) -> u8 {
    match action {
        Action::Xor => x ^ XOR_MASK,
        Action::Add => x.wrapping_add(SHIFT),
        Action::Sub => x.wrapping_sub(SHIFT),
    }
}

/// Undo an action applied to a byte
pub fn inverse(action: Action, y: u8) -> u8 {
    match action {
        // xor is self-inverse
        Action::Xor => y ^ XOR_MASK,
        Action::Add => y.wrapping_sub(SHIFT),
        Action::Sub => y.wrapping_add(SHIFT),
    }
}

/// Outcome of an exhaustive invertibility check for one action
#[derive(Debug, Clone, Serialize)]
pub struct ActionCheck {
    pub action: Action,
    /// Inputs whose round trip did not come back unchanged
    pub failures: Vec<u8>,
}

impl ActionCheck {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Check the round-trip law for one action over all 256 bytes
pub fn verify_action<T: TransformSet + ?Sized>(transforms: &T, action: Action) -> ActionCheck {
    let failures = (0..=u8::MAX)
        .filter(|&x| transforms.inverse(action, transforms.transform(action, x)) != x)
        .collect();
    ActionCheck { action, failures }
}

/// Check the round-trip law for every action in a set
pub fn verify<T: TransformSet + ?Sized>(transforms: &T, actions: &ActionSet) -> Vec<ActionCheck> {
    actions.iter().map(|a| verify_action(transforms, a)).collect()
}
