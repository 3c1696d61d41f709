//! Motivational quote deck with bounded repeat suppression.
//!
//! The deck owns its recent-draw history as an explicit bounded queue,
//! constructed once by whichever component issues quotes.

use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;

/// How many recent draws are suppressed from reappearing.
const HISTORY_SIZE: usize = 15;
/// Give up searching for a fresh index after this many rolls.
const MAX_ATTEMPTS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

const QUOTES: &[Quote] = &[
    Quote { text: "The secret of getting ahead is getting started.", author: "Mark Twain" },
    Quote { text: "It always seems impossible until it's done.", author: "Nelson Mandela" },
    Quote { text: "Focus on being productive instead of busy.", author: "Tim Ferriss" },
    Quote { text: "Don't watch the clock; do what it does. Keep going.", author: "Sam Levenson" },
    Quote { text: "Success is the sum of small efforts, repeated day in and day out.", author: "Robert Collier" },
    Quote { text: "Quality is not an act, it is a habit.", author: "Aristotle" },
    Quote { text: "Little by little, one travels far.", author: "J.R.R. Tolkien" },
    Quote { text: "Fall seven times, stand up eight.", author: "Japanese Proverb" },
    Quote { text: "Start where you are. Use what you have. Do what you can.", author: "Arthur Ashe" },
    Quote { text: "Either you run the day or the day runs you.", author: "Jim Rohn" },
    Quote { text: "Motivation is what gets you started. Habit is what keeps you going.", author: "Jim Ryun" },
    Quote { text: "A year from now you may wish you had started today.", author: "Karen Lamb" },
    Quote { text: "Action is the foundational key to all success.", author: "Pablo Picasso" },
    Quote { text: "Energy and persistence conquer all things.", author: "Benjamin Franklin" },
    Quote { text: "There is no substitute for hard work.", author: "Thomas Edison" },
    Quote { text: "Perseverance is failing 19 times and succeeding the 20th.", author: "Julie Andrews" },
    Quote { text: "Learning never exhausts the mind.", author: "Leonardo da Vinci" },
    Quote { text: "In the middle of every difficulty lies opportunity.", author: "Albert Einstein" },
];

const MEOW_QUOTES: &[Quote] = &[
    Quote { text: "Meow. (Just do the thing, human.)", author: "Professor Whiskers" },
    Quote { text: "Purr-ductivity is key.", author: "Juno" },
    Quote { text: "Nap later, work now. Then treats.", author: "The Cat" },
    Quote { text: "Stay curious. And feed me.", author: "The Cat" },
    Quote { text: "Knock your goals off the table like a glass of water.", author: "Juno" },
    Quote { text: "Stretch. Yawn. Focus. Repeat.", author: "Yoga Cat" },
    Quote { text: "Chase excellence like it's a red dot.", author: "Juno" },
    Quote { text: "Hiss at procrastination.", author: "Angry Cat" },
    Quote { text: "Pawsitive vibes only.", author: "Kitten" },
    Quote { text: "Slow blink... that means 'You got this'.", author: "Juno" },
];

/// A quote source that avoids repeating recent draws.
#[derive(Debug)]
pub struct QuoteDeck {
    quotes: &'static [Quote],
    history: VecDeque<usize>,
}

impl QuoteDeck {
    pub fn standard() -> Self {
        Self::from_quotes(QUOTES)
    }

    pub fn meow() -> Self {
        Self::from_quotes(MEOW_QUOTES)
    }

    fn from_quotes(quotes: &'static [Quote]) -> Self {
        Self {
            quotes,
            history: VecDeque::with_capacity(HISTORY_SIZE),
        }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Draw a quote, skipping recently drawn ones where the deck size
    /// allows. Falls back to any index once the retry budget is spent.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Quote {
        let mut index = rng.gen_range(0..self.quotes.len());
        let mut attempts = 1;
        while self.history.contains(&index) && attempts < MAX_ATTEMPTS {
            index = rng.gen_range(0..self.quotes.len());
            attempts += 1;
        }

        self.history.push_back(index);
        if self.history.len() > self.history_cap() {
            self.history.pop_front();
        }
        self.quotes[index]
    }

    /// Suppression window, shrunk for small decks so plenty of fresh
    /// indices always remain.
    fn history_cap(&self) -> usize {
        HISTORY_SIZE.min(self.quotes.len() / 2)
    }
}
