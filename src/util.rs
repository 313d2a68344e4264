use inlinable_string::{InlinableString, StringExt};

pub fn char_to_string(c: char) -> InlinableString {
    let mut s = InlinableString::new();
    s.push(c);
    s
}

// Scanning position over a piece of text, shared by the term tokenizer and the arithmetic evaluator.
pub struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    consumed: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor { chars: input.chars().peekable(), consumed: 0 }
    }

    // Current character, without advancing
    pub fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    pub fn advance(&mut self) -> Option<char> {
        let next = self.chars.next();
        if next.is_some() {
            self.consumed += 1;
        }
        next
    }

    // Number of characters consumed so far
    pub fn position(&self) -> usize {
        self.consumed
    }

    // Consume characters while the predicate holds, collecting them into a string
    pub fn take_while<F: FnMut(char) -> bool>(&mut self, mut pred: F) -> InlinableString {
        let mut out = InlinableString::new();
        while let Some(c) = self.peek() {
            if !pred(c) { break }
            out.push(c);
            self.advance();
        }
        out
    }
}

// Parse a run of ASCII digits, clamping to the maximum instead of overflowing.
pub fn saturating_digits<T: TryFrom<u64> + Bounded>(digits: &str) -> T {
    let mut acc: u64 = 0;
    for d in digits.bytes().filter(u8::is_ascii_digit) {
        acc = acc.saturating_mul(10).saturating_add(u64::from(d - b'0'));
    }
    T::try_from(acc).unwrap_or_else(|_| T::MAX)
}

pub trait Bounded {
    const MAX: Self;
}

impl Bounded for i64 {
    const MAX: Self = i64::MAX;
}

impl Bounded for i32 {
    const MAX: Self = i32::MAX;
}
