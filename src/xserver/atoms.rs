use x11rb::protocol::xproto::Atom;

// Interned atoms the window manager reads or writes.
x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        UTF8_STRING,
        WM_PROTOCOLS,
        WM_DELETE_WINDOW,
        WM_STATE,
        WM_TAKE_FOCUS,
        _NET_ACTIVE_WINDOW,
        _NET_SUPPORTED,
        _NET_WM_NAME,
        _NET_WM_STATE,
        _NET_SUPPORTING_WM_CHECK,
        _NET_WM_STATE_FULLSCREEN,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_DIALOG,
        _NET_WM_ICON,
        _NET_WM_WINDOW_OPACITY,
        _NET_CLIENT_LIST,
    }
}

impl Atoms {
    /// Atoms advertised in `_NET_SUPPORTED`.
    pub fn supported(&self) -> [Atom; 10] {
        [
            self._NET_ACTIVE_WINDOW,
            self._NET_SUPPORTED,
            self._NET_WM_NAME,
            self._NET_WM_STATE,
            self._NET_SUPPORTING_WM_CHECK,
            self._NET_WM_STATE_FULLSCREEN,
            self._NET_WM_WINDOW_TYPE,
            self._NET_WM_WINDOW_TYPE_DIALOG,
            self._NET_WM_ICON,
            self._NET_CLIENT_LIST,
        ]
    }
}
