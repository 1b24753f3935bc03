//! Property-based tests of the automaton against generated pattern/subject pairs.

mod matching;
