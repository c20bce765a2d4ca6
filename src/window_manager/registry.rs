//! The per-monitor member list and focus history, both threaded through
//! the client arena.

use super::WindowManager;
use crate::bar::DrawSurface;
use crate::client::{Client, Position};
use crate::display::DisplayServer;
use crate::errors::WmResult;
use std::collections::HashMap;
use x11rb::protocol::xproto::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Members,
    Stack,
}

impl Link {
    fn next(self, client: &Client) -> Option<Window> {
        match self {
            Self::Members => client.next,
            Self::Stack => client.stack_next,
        }
    }

    fn set_next(self, client: &mut Client, next: Option<Window>) {
        match self {
            Self::Members => client.next = next,
            Self::Stack => client.stack_next = next,
        }
    }
}

/// Follow `link` from `head`. Stops at a handle that is not in the arena.
fn walk(clients: &HashMap<Window, Client>, head: Option<Window>, link: Link) -> Vec<Window> {
    let mut windows = Vec::new();
    let mut cursor = head;

    while let Some(window) = cursor {
        let Some(client) = clients.get(&window) else {
            break;
        };
        if windows.len() > clients.len() {
            break;
        }
        windows.push(window);
        cursor = link.next(client);
    }

    windows
}

impl<X: DisplayServer, D: DrawSurface> WindowManager<X, D> {
    /// Members of monitor `m` in arrangement order, master first.
    pub(super) fn clients_in_order(&self, m: usize) -> Vec<Window> {
        let head = self.monitors.get(m).and_then(|m| m.clients_head);
        walk(&self.clients, head, Link::Members)
    }

    /// Members of monitor `m`, most recently focused first.
    pub(super) fn stack_in_order(&self, m: usize) -> Vec<Window> {
        let head = self.monitors.get(m).and_then(|m| m.stack_head);
        walk(&self.clients, head, Link::Stack)
    }

    pub(super) fn visible_stack(&self, m: usize) -> Vec<Window> {
        self.stack_in_order(m)
            .into_iter()
            .filter(|&w| self.is_visible_window(w))
            .collect()
    }

    /// Visible tiled members of monitor `m` in arrangement order.
    pub(super) fn tiled_clients(&self, m: usize) -> Vec<Window> {
        self.clients_in_order(m)
            .into_iter()
            .filter(|w| {
                self.clients
                    .get(w)
                    .is_some_and(|c| c.is_tiled() && self.is_visible(c))
            })
            .collect()
    }

    /// The first visible tiled client at or after `from` in member order.
    pub(super) fn next_tiled(&self, from: Option<Window>) -> Option<Window> {
        walk(&self.clients, from, Link::Members)
            .into_iter()
            .find(|w| {
                self.clients
                    .get(w)
                    .is_some_and(|c| c.is_tiled() && self.is_visible(c))
            })
    }

    fn list_head(&mut self, m: usize, link: Link) -> Option<&mut Option<Window>> {
        let monitor = self.monitors.get_mut(m)?;
        Some(match link {
            Link::Members => &mut monitor.clients_head,
            Link::Stack => &mut monitor.stack_head,
        })
    }

    fn set_next(&mut self, window: Window, link: Link, next: Option<Window>) {
        if let Some(client) = self.clients.get_mut(&window) {
            link.set_next(client, next);
        }
    }

    fn push_front(&mut self, window: Window, link: Link) {
        let Some(m) = self.clients.get(&window).map(|c| c.monitor_index) else {
            return;
        };
        let Some(head) = self.list_head(m, link) else {
            return;
        };
        let previous = head.replace(window);
        self.set_next(window, link, previous);
    }

    fn push_back(&mut self, window: Window, link: Link) {
        let Some(m) = self.clients.get(&window).map(|c| c.monitor_index) else {
            return;
        };
        let Some(head) = self.list_head(m, link).map(|head| *head) else {
            return;
        };

        match walk(&self.clients, head, link).last().copied() {
            Some(last) => self.set_next(last, link, Some(window)),
            None => {
                if let Some(head) = self.list_head(m, link) {
                    *head = Some(window);
                }
            }
        }
        self.set_next(window, link, None);
    }

    fn unlink(&mut self, window: Window, link: Link) {
        let Some((m, next)) = self
            .clients
            .get(&window)
            .map(|c| (c.monitor_index, link.next(c)))
        else {
            return;
        };
        let Some(head) = self.list_head(m, link) else {
            return;
        };

        if *head == Some(window) {
            *head = next;
        } else {
            let head = *head;
            let previous = walk(&self.clients, head, link)
                .into_iter()
                .find(|w| self.clients.get(w).and_then(|c| link.next(c)) == Some(window));
            match previous {
                Some(previous) => self.set_next(previous, link, next),
                None => return,
            }
        }

        self.set_next(window, link, None);
    }

    pub(super) fn attach(&mut self, window: Window) {
        self.push_front(window, Link::Members);
    }

    pub(super) fn attach_tail(&mut self, window: Window) {
        self.push_back(window, Link::Members);
    }

    pub(super) fn detach(&mut self, window: Window) {
        self.unlink(window, Link::Members);
    }

    pub(super) fn attach_stack(&mut self, window: Window) {
        self.push_front(window, Link::Stack);
    }

    pub(super) fn attach_stack_tail(&mut self, window: Window) {
        self.push_back(window, Link::Stack);
    }

    /// Remove `window` from the focus history. When it was the monitor's
    /// selection, the next visible client in the history takes over.
    pub(super) fn detach_stack(&mut self, window: Window) {
        let Some(m) = self.clients.get(&window).map(|c| c.monitor_index) else {
            return;
        };
        self.unlink(window, Link::Stack);

        if self.monitors[m].selected_client == Some(window) {
            self.monitors[m].selected_client = self.visible_stack(m).first().copied();
        }
    }

    /// Make `window` the master and tile it.
    pub(super) fn set_master(&mut self, window: Window) -> WmResult<()> {
        self.detach(window);
        self.attach(window);
        self.focus(Some(window))?;
        self.set_position(window, Position::Tiled, true)
    }

    /// Move `window` to the head of the member list and re-arrange.
    pub(super) fn pop(&mut self, window: Window) -> WmResult<()> {
        let Some(m) = self.clients.get(&window).map(|c| c.monitor_index) else {
            return Ok(());
        };
        self.detach(window);
        self.attach(window);
        self.focus(Some(window))?;
        self.arrange(Some(m))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::*;

    #[test]
    fn new_clients_become_master_and_most_recent() {
        let mut wm = wm();
        map(&mut wm, 10);
        map(&mut wm, 11);
        map(&mut wm, 12);

        assert_eq!(wm.clients_in_order(0), vec![12, 11, 10]);
        assert_eq!(wm.stack_in_order(0), vec![12, 11, 10]);
    }

    #[test]
    fn detaching_keeps_the_rest_linked() {
        let mut wm = wm();
        map(&mut wm, 10);
        map(&mut wm, 11);
        map(&mut wm, 12);

        wm.detach(11);
        assert_eq!(wm.clients_in_order(0), vec![12, 10]);

        wm.detach(12);
        wm.detach(10);
        assert!(wm.clients_in_order(0).is_empty());
        assert_eq!(wm.monitors[0].clients_head, None);

        // detaching a non-member changes nothing
        wm.detach(10);
        assert!(wm.clients_in_order(0).is_empty());
    }

    #[test]
    fn detaching_the_selection_reseeds_it_from_the_history() {
        let mut wm = wm();
        map(&mut wm, 10);
        map(&mut wm, 11);
        map(&mut wm, 12);
        wm.focus(Some(11)).unwrap();
        assert_eq!(wm.stack_in_order(0), vec![11, 12, 10]);

        wm.detach_stack(11);

        assert_eq!(wm.monitors[0].selected_client, Some(12));
        assert_eq!(wm.stack_in_order(0), vec![12, 10]);
    }

    #[test]
    fn tail_attachment_appends() {
        let mut wm = wm();
        map(&mut wm, 10);
        map(&mut wm, 11);

        wm.detach(11);
        wm.attach_tail(11);

        assert_eq!(wm.clients_in_order(0), vec![10, 11]);
    }

    #[test]
    fn next_tiled_skips_floating_clients() {
        let mut wm = wm();
        map(&mut wm, 10);
        map(&mut wm, 11);
        map(&mut wm, 12);
        wm.clients.get_mut(&12).unwrap().position = crate::client::Position::None;

        assert_eq!(wm.next_tiled(Some(12)), Some(11));
        assert_eq!(wm.tiled_clients(0), vec![11, 10]);
    }
}
