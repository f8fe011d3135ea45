/*!
 * Canonical book table.
 *
 * Book codes follow the three-letter identifiers used by both export
 * dialects (`\id GEN`, `\rcrd GEN 1`, `\vref GEN.1:1`).
 */

/// Canonical information about one book of the Protestant canon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonBook {
    /// Canonical book number (1 = Genesis, 66 = Revelation)
    pub number: u16,
    /// Three-letter book code
    pub code: &'static str,
    /// English book name
    pub name: &'static str,
    /// Number of chapters in the canonical versification
    pub chapters: u16,
}

const fn book(number: u16, code: &'static str, name: &'static str, chapters: u16) -> CanonBook {
    CanonBook { number, code, name, chapters }
}

/// The 66 books in canonical order
pub static CANON: [CanonBook; 66] = [
    book(1, "GEN", "Genesis", 50),
    book(2, "EXO", "Exodus", 40),
    book(3, "LEV", "Leviticus", 27),
    book(4, "NUM", "Numbers", 36),
    book(5, "DEU", "Deuteronomy", 34),
    book(6, "JOS", "Joshua", 24),
    book(7, "JDG", "Judges", 21),
    book(8, "RUT", "Ruth", 4),
    book(9, "1SA", "1 Samuel", 31),
    book(10, "2SA", "2 Samuel", 24),
    book(11, "1KI", "1 Kings", 22),
    book(12, "2KI", "2 Kings", 25),
    book(13, "1CH", "1 Chronicles", 29),
    book(14, "2CH", "2 Chronicles", 36),
    book(15, "EZR", "Ezra", 10),
    book(16, "NEH", "Nehemiah", 13),
    book(17, "EST", "Esther", 10),
    book(18, "JOB", "Job", 42),
    book(19, "PSA", "Psalms", 150),
    book(20, "PRO", "Proverbs", 31),
    book(21, "ECC", "Ecclesiastes", 12),
    book(22, "SNG", "Song of Songs", 8),
    book(23, "ISA", "Isaiah", 66),
    book(24, "JER", "Jeremiah", 52),
    book(25, "LAM", "Lamentations", 5),
    book(26, "EZK", "Ezekiel", 48),
    book(27, "DAN", "Daniel", 12),
    book(28, "HOS", "Hosea", 14),
    book(29, "JOL", "Joel", 3),
    book(30, "AMO", "Amos", 9),
    book(31, "OBA", "Obadiah", 1),
    book(32, "JON", "Jonah", 4),
    book(33, "MIC", "Micah", 7),
    book(34, "NAM", "Nahum", 3),
    book(35, "HAB", "Habakkuk", 3),
    book(36, "ZEP", "Zephaniah", 3),
    book(37, "HAG", "Haggai", 2),
    book(38, "ZEC", "Zechariah", 14),
    book(39, "MAL", "Malachi", 4),
    book(40, "MAT", "Matthew", 28),
    book(41, "MRK", "Mark", 16),
    book(42, "LUK", "Luke", 24),
    book(43, "JHN", "John", 21),
    book(44, "ACT", "Acts", 28),
    book(45, "ROM", "Romans", 16),
    book(46, "1CO", "1 Corinthians", 16),
    book(47, "2CO", "2 Corinthians", 13),
    book(48, "GAL", "Galatians", 6),
    book(49, "EPH", "Ephesians", 6),
    book(50, "PHP", "Philippians", 4),
    book(51, "COL", "Colossians", 4),
    book(52, "1TH", "1 Thessalonians", 5),
    book(53, "2TH", "2 Thessalonians", 3),
    book(54, "1TI", "1 Timothy", 6),
    book(55, "2TI", "2 Timothy", 4),
    book(56, "TIT", "Titus", 3),
    book(57, "PHM", "Philemon", 1),
    book(58, "HEB", "Hebrews", 13),
    book(59, "JAS", "James", 5),
    book(60, "1PE", "1 Peter", 5),
    book(61, "2PE", "2 Peter", 3),
    book(62, "1JN", "1 John", 5),
    book(63, "2JN", "2 John", 1),
    book(64, "3JN", "3 John", 1),
    book(65, "JUD", "Jude", 1),
    book(66, "REV", "Revelation", 22),
];

/// Look up a book by canonical number
pub fn by_number(number: u16) -> Option<&'static CanonBook> {
    if number == 0 {
        return None;
    }
    CANON.get(usize::from(number) - 1)
}

/// Look up a book by its three-letter code (case-insensitive)
pub fn by_code(code: &str) -> Option<&'static CanonBook> {
    let code = code.trim();
    CANON.iter().find(|b| b.code.eq_ignore_ascii_case(code))
}

/// Canonical number for a book code
pub fn book_number_from_code(code: &str) -> Option<u16> {
    by_code(code).map(|b| b.number)
}

/// Whether the book has exactly one canonical chapter (Obadiah, Philemon, 2-3 John, Jude)
pub fn is_single_chapter_book(number: u16) -> bool {
    by_number(number).is_some_and(|b| b.chapters == 1)
}
