use crate::layout::{LineBox, PageBox, WordBox};
use crate::model::StreamItem;

/// Group a character/marker stream into a page of lines of words.
///
/// Words are sealed on `Space` or `Newline`, lines on `Newline`, and both on
/// end of stream. A word or line that never received a child is discarded,
/// so every box in the returned page has a consistent perimeter.
pub fn assemble(items: &[StreamItem]) -> PageBox {
    let mut page = PageBox::new();
    let mut line = LineBox::new();
    let mut word = WordBox::new();

    for item in items {
        match item {
            StreamItem::Char(c) => word.add_child(*c),
            StreamItem::Space => seal_word(&mut word, &mut line),
            StreamItem::Newline => {
                seal_word(&mut word, &mut line);
                seal_line(&mut line, &mut page);
            }
        }
    }
    seal_word(&mut word, &mut line);
    seal_line(&mut line, &mut page);

    page
}

fn seal_word(word: &mut WordBox, line: &mut LineBox) {
    let finished = std::mem::take(word);
    if !finished.is_empty() {
        line.add_child(finished);
    }
}

fn seal_line(line: &mut LineBox, page: &mut PageBox) {
    let finished = std::mem::take(line);
    if !finished.is_empty() {
        page.add_child(finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Bounded, Perimeter};
    use crate::model::CharBox;

    fn ch(c: char, xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> StreamItem {
        StreamItem::Char(CharBox::new(c, xmin, ymin, xmax, ymax))
    }

    #[test]
    fn test_empty_stream() {
        assert!(assemble(&[]).is_empty());
    }

    #[test]
    fn test_markers_only() {
        let page = assemble(&[StreamItem::Newline, StreamItem::Space, StreamItem::Newline]);
        assert!(page.is_empty());
    }

    #[test]
    fn test_words_and_lines() {
        let items = vec![
            ch('a', 0, 0, 5, 5),
            StreamItem::Space,
            ch('b', 10, 0, 15, 5),
            StreamItem::Newline,
            ch('c', 0, 10, 5, 15),
        ];
        let page = assemble(&items);
        assert_eq!(page.children().len(), 2);

        let first = &page.children()[0];
        assert_eq!(first.children().len(), 2);
        assert_eq!(first.children()[0].text(), "a");
        assert_eq!(first.children()[1].text(), "b");
        assert_eq!(first.perimeter(), Perimeter::new(0, 0, 15, 5));

        let second = &page.children()[1];
        assert_eq!(second.children().len(), 1);
        assert_eq!(second.children()[0].text(), "c");
        assert_eq!(page.perimeter(), Perimeter::new(0, 0, 15, 15));
    }

    #[test]
    fn test_single_word_line_before_newline_is_kept() {
        let items = vec![ch('a', 0, 0, 5, 5), StreamItem::Newline, ch('b', 0, 10, 5, 15)];
        let page = assemble(&items);
        assert_eq!(page.children().len(), 2);
        assert_eq!(page.children()[0].children()[0].text(), "a");
    }

    #[test]
    fn test_repeated_markers_do_not_create_empty_nodes() {
        let items = vec![
            StreamItem::Space,
            ch('a', 0, 0, 5, 5),
            StreamItem::Space,
            StreamItem::Space,
            StreamItem::Newline,
            StreamItem::Newline,
            ch('b', 0, 10, 5, 15),
            StreamItem::Space,
        ];
        let page = assemble(&items);
        assert_eq!(page.children().len(), 2);
        for line in page.children() {
            assert_eq!(line.children().len(), 1);
            assert!(line.validate().is_ok());
        }
    }
}
