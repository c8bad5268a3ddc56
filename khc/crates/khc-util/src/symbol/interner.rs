//! Global string table backed by DashMap.
//!
//! The table is fully thread-safe: multiple parses running on separate
//! threads may intern concurrently without blocking each other. Interned
//! strings are leaked to obtain `'static` references; the table lives for
//! the program's whole lifetime and entries are never removed.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::LazyLock;

use ahash::AHasher;
use dashmap::DashMap;

use super::{InternerStats, Symbol};

/// The global string table instance.
///
/// Initialized on first use. All Kithare keywords and operator words are
/// pre-interned so they are available without allocation during lexing.
pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

/// Words pre-interned at table initialization.
///
/// Covers the keyword list, the word-spelled operators, and the primitive
/// type names that show up in virtually every source file.
const KNOWN_WORDS: &[&str] = &[
    // Declaration keywords
    "import", "include", "as", "try", "def", "class", "struct", "enum", "alias",
    // Specifiers and modifiers
    "ref", "public", "private", "static", "incase", "wild",
    // Control flow
    "if", "elif", "else", "for", "while", "do", "break", "continue", "return", "in",
    // Word-spelled operators
    "and", "or", "xor", "not",
    // Primitive type names
    "void", "bool", "byte", "sbyte", "short", "ushort", "int", "uint", "long", "ulong",
    "float", "double", "ifloat", "idouble", "char", "str", "buffer",
    // Common identifiers
    "main", "self", "new", "len",
];

/// Thread-safe string table.
///
/// Maps a string hash to `(string, index)` for forward lookup and keeps a
/// separate index-keyed map for reverse lookup, so both directions are
/// O(1).
pub struct StringTable {
    /// Maps string hash to (string, symbol index).
    map: DashMap<u64, (&'static str, u32)>,

    /// Maps symbol index back to its string.
    by_index: DashMap<u32, &'static str>,

    /// Counter for the next fresh index.
    next_index: AtomicU32,

    /// Number of hash collisions encountered.
    collisions: AtomicUsize,

    /// Lookups that found an existing entry.
    hits: AtomicUsize,

    /// Lookups that had to allocate.
    misses: AtomicUsize,
}

impl StringTable {
    /// Create a new empty string table.
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity(256),
            by_index: DashMap::with_capacity(256),
            next_index: AtomicU32::new(0),
            collisions: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Pre-intern all known words.
    fn initialize_known_symbols(&self) {
        for word in KNOWN_WORDS {
            self.intern(word);
        }
    }

    /// Intern a string, returning its symbol.
    ///
    /// If the string is already interned, returns the existing symbol;
    /// otherwise allocates a new entry.
    pub fn intern(&self, string: &str) -> Symbol {
        let hash = Self::hash_string(string);

        // Fast path: the string is already interned.
        if let Some(entry) = self.map.get(&hash) {
            if entry.value().0 == string {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Symbol {
                    index: entry.value().1,
                };
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);

        match self.map.entry(hash) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                if entry.get().0 == string {
                    return Symbol {
                        index: entry.get().1,
                    };
                }
                // Different string with the same hash.
                self.handle_collision(string, hash)
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
                let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
                entry.insert((interned, idx));
                self.by_index.insert(idx, interned);
                Symbol { index: idx }
            }
        }
    }

    /// Resolve a hash collision by probing with offset hashes.
    fn handle_collision(&self, string: &str, original_hash: u64) -> Symbol {
        const MAX_PROBES: u64 = 32;
        const PROBE_PRIME: u64 = 0x9e3779b97f4a7c15;

        for i in 1u64..=MAX_PROBES {
            let probe_hash = original_hash.wrapping_add(i.wrapping_mul(PROBE_PRIME));

            if let Some(entry) = self.map.get(&probe_hash) {
                if entry.value().0 == string {
                    return Symbol {
                        index: entry.value().1,
                    };
                }
            } else {
                self.collisions.fetch_add(1, Ordering::Relaxed);
                let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
                let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
                self.map.insert(probe_hash, (interned, idx));
                self.by_index.insert(idx, interned);
                return Symbol { index: idx };
            }
        }

        // All probe slots taken by other strings; extremely unlikely.
        self.collisions.fetch_add(1, Ordering::Relaxed);
        let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
        let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
        self.by_index.insert(idx, interned);
        Symbol { index: idx }
    }

    /// Get the string for a symbol, or `None` for an invalid index.
    pub fn get(&self, symbol: Symbol) -> Option<&'static str> {
        self.by_index.get(&symbol.index).map(|entry| *entry.value())
    }

    #[inline]
    fn hash_string(string: &str) -> u64 {
        let mut hasher = AHasher::default();
        string.hash(&mut hasher);
        hasher.finish()
    }

    /// Snapshot of interner statistics.
    pub fn stats(&self) -> InternerStats {
        InternerStats {
            count: self.by_index.len(),
            capacity: self.map.capacity(),
            collisions: self.collisions.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
