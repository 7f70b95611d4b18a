/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self { w, h }
    }

    /// Row the wall slices are centred on.
    #[inline]
    pub fn mid_y(&self) -> i32 {
        self.h as i32 / 2
    }
}
