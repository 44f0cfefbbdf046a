//! The administrator's list of account requests waiting for approval.

use crate::{
    api::Backend,
    id::{
        Id,
        Users,
    },
    lang::{
        Message,
        Toast,
    },
};

/// Rows of the accounts page, one per pending account request.
#[derive(Debug, Clone, Default)]
pub(crate) struct PendingAccounts {
    rows: Vec<Id<Users>>,
}

impl PendingAccounts {
    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = Id<Users>> + '_ {
        self.rows.iter().copied()
    }

    fn remove(&mut self, user: Id<Users>) {
        self.rows.retain(|&row| row != user);
    }
}

impl FromIterator<Id<Users>> for PendingAccounts {
    fn from_iter<I: IntoIterator<Item = Id<Users>>>(iter: I) -> Self {
        let mut rows = Vec::default();
        for user in iter {
            if !rows.contains(&user) {
                rows.push(user);
            }
        }
        Self { rows }
    }
}

/// Approves (`create`) or rejects an account request. The row is removed only once the backend confirms.
pub(crate) async fn manage_user(backend: &dyn Backend, accounts: &mut PendingAccounts, user: Id<Users>, create: bool) -> Toast {
    match backend.manage_user(user, create).await {
        Ok(()) => {
            accounts.remove(user);
            log::info!("{} account request {user}", if create { "approved" } else { "rejected" });
            Toast::new(if create { Message::AccountCreated } else { Message::AccountRejected })
        }
        Err(e) => {
            log::warn!("failed to manage account request {user}: {e}");
            Toast::request_failed()
        }
    }
}
