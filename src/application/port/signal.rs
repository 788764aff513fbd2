// SPDX-License-Identifier: MPL-2.0
//! Notification port.

use crate::domain::ViewToken;

/// Port for process-wide notifications raised by the view manager.
pub trait SignalHub {
    /// Raised after a switch commits: `outgoing` is `None` when no view
    /// was active before.
    fn view_changed(&mut self, outgoing: Option<&ViewToken>, incoming: &ViewToken);
}
