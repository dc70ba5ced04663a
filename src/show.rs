/// Helper trait which can be used to display symbols, words and tree nodes. For a word this
/// should be the concatenation of its symbols, with `ε` for the empty word. Just use something
/// that makes sense, this is mainly used for debugging purposes.
pub trait Show {
    /// Returns a human readable representation of `self`.
    fn show(&self) -> String;
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for u8 {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for u32 {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl<X: Show> Show for &X {
    fn show(&self) -> String {
        X::show(self)
    }
}
