/// How a [`CharBucket`] treats whitespace while accumulating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitespacePolicy {
    /// Drop every whitespace character.
    None,
    /// Keep every character verbatim.
    All,
    /// Keep the first whitespace character of a run, drop the rest.
    /// Runs are detected across `feed` calls.
    Controlled,
}

/// Accumulates characters one at a time under a whitespace policy.
///
/// Both statement parsers build their fields with buckets: tag names use
/// `None`, expression arguments use `Controlled`, surrounding text uses `All`.
#[derive(Debug)]
pub struct CharBucket {
    policy: WhitespacePolicy,
    chars: String,
    last: Option<char>,
}

impl CharBucket {
    pub fn new(policy: WhitespacePolicy) -> Self {
        Self {
            policy,
            chars: String::new(),
            last: None,
        }
    }

    /// Append one character, subject to the policy.
    pub fn feed(&mut self, ch: char) {
        match self.policy {
            WhitespacePolicy::All => self.chars.push(ch),
            WhitespacePolicy::None => {
                if !ch.is_whitespace() {
                    self.chars.push(ch);
                }
            }
            WhitespacePolicy::Controlled => {
                if ch.is_whitespace() && self.last.is_some_and(|c| c.is_whitespace()) {
                    return;
                }
                self.chars.push(ch);
                self.last = Some(ch);
            }
        }
    }

    /// Everything accumulated so far. Non-destructive.
    pub fn get(&self) -> &str {
        &self.chars
    }

    /// Take the accumulated characters out, resetting the bucket.
    pub fn take(&mut self) -> String {
        self.last = None;
        std::mem::take(&mut self.chars)
    }
}
