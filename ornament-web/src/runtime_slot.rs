//! Shared ownership of the running scene between the animation frame and
//! the event listeners. The frame that sees the loop stop drops the scene.

use std::cell::RefCell;
use std::rc::Rc;

use ornament_sim::LoopControl;

pub struct RuntimeSlot<T> {
    inner: Rc<RefCell<Option<T>>>,
}

impl<T> Clone for RuntimeSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> RuntimeSlot<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Some(value))),
        }
    }

    /// Run `f` on the value. Skipped when the value is released or
    /// already borrowed by a re-entrant callback.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut slot = self.inner.try_borrow_mut().ok()?;
        slot.as_mut().map(f)
    }

    /// Run one frame. A `Stop` releases the value; frames after that stop
    /// immediately.
    pub fn frame(&self, f: impl FnOnce(&mut T) -> LoopControl) -> LoopControl {
        let Ok(mut slot) = self.inner.try_borrow_mut() else {
            return LoopControl::Continue;
        };
        let Some(value) = slot.as_mut() else {
            return LoopControl::Stop;
        };
        let control = f(value);
        if control == LoopControl::Stop {
            let released = slot.take();
            drop(slot);
            drop(released);
        }
        control
    }

    pub fn is_released(&self) -> bool {
        self.inner.try_borrow().map_or(false, |slot| slot.is_none())
    }
}
