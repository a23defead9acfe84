use invoicely_core::{KeyValueStore, RepoError, RepoResult};
use std::cell::{Cell, RefCell};

/// In-memory slot whose writes can be switched to fail.
#[derive(Default)]
pub struct FlakySlot {
    pub value: RefCell<Option<String>>,
    pub fail_writes: Cell<bool>,
}

impl KeyValueStore for FlakySlot {
    fn get_value(&self, _key: &str) -> RepoResult<Option<String>> {
        Ok(self.value.borrow().clone())
    }

    fn set_value(&self, _key: &str, value: &str) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::InvalidData("quota exceeded".to_string()));
        }
        *self.value.borrow_mut() = Some(value.to_string());
        Ok(())
    }
}
