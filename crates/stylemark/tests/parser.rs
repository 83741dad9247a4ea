use std::sync::Arc;

use stylemark::{
    Attributes, Color, CustomElement, Element, MarkdownParser, ParserOptions, StyledText,
};

fn with_markup_line_starts() -> MarkdownParser {
    MarkdownParser::with_options(ParserOptions {
        markup_line_starts: true,
        ..ParserOptions::default()
    })
}

fn typeface_at(text: &StyledText, offset: usize) -> stylemark::Typeface {
    text.attributes_at(offset)
        .and_then(|attributes| attributes.typeface.clone())
        .expect("typeface is always set")
}

#[test]
fn test_list_items() {
    let parser = MarkdownParser::new();
    let text = parser.parse("- item one\n- item two");

    assert_eq!(text.as_str(), "• item one\n• item two");
    assert!(!text.as_str().contains('-'));

    let first = text.attributes_at(0).unwrap();
    let second = text.attributes_at("• item one\n".len()).unwrap();
    let level_one = parser.builtins().list.levels().for_level(1);
    assert_eq!(first.typeface, level_one.typeface);
    assert_eq!(first.paragraph, second.paragraph);
    assert_eq!(first.paragraph.as_ref(), Some(parser.builtins().list.paragraph()));
}

#[test]
fn test_sub_item_indicator() {
    let parser = MarkdownParser::new();
    let text = parser.parse("- parent\n  - child\n- sibling");
    assert_eq!(text.as_str(), "• parent\n    ◦ child\n• sibling");
}

#[test]
fn test_marker_run_beyond_max_level_is_literal() {
    let mut parser = MarkdownParser::new();
    let list = parser.builtins().list.clone().with_max_level(2);
    parser.builtins_mut().list = list;

    let text = parser.parse("-- two\n--- three");
    assert_eq!(text.as_str(), "• two\n--- three");
}

#[test]
fn test_bold_and_italic() {
    let parser = MarkdownParser::new();
    let text = parser.parse("**bold** and *italic*");

    assert_eq!(text.as_str(), "bold and italic");
    assert!(!text.as_str().contains('*'));
    assert_eq!(
        text.attributes_at(0).unwrap().typeface,
        parser.builtins().bold.attributes().typeface
    );
    assert_eq!(
        text.attributes_at(9).unwrap().typeface,
        parser.builtins().italic.attributes().typeface
    );
    assert!(!typeface_at(&text, 5).bold);
}

#[test]
fn test_blank_lines_collapse() {
    let parser = MarkdownParser::new();
    assert_eq!(parser.parse("first\n\n\n\nsecond").as_str(), "first\nsecond");
    assert_eq!(parser.parse("first\n\nsecond").as_str(), "first\nsecond");
    assert_eq!(parser.parse("first  \nsecond").as_str(), "first\n\nsecond");
}

#[test]
fn test_markup_at_line_start_is_stripped_by_default() {
    let parser = MarkdownParser::new();
    assert_eq!(parser.parse("[l](http://u.io) x").as_str(), "l](http://u.io) x");

    let text = parser.parse("`c` y");
    assert_eq!(text.as_str(), "c` y");
    assert_eq!(text.attributes_at(0).unwrap().code_language, None);
}

#[test]
fn test_underscore_emphasis_after_snake_case() {
    let parser = MarkdownParser::new();
    let text = parser.parse("snake_case and _real_");

    assert_eq!(text.as_str(), "snake_case and real");
    assert!(typeface_at(&text, 15).italic);
    assert!(!typeface_at(&text, 5).italic);
}

#[test]
fn test_large_input_is_parsed_in_linear_time() {
    let count = 20_000;
    let input = "**b** x ".repeat(count);
    let parser = MarkdownParser::new();

    let started = std::time::Instant::now();
    let text = parser.parse(&input);
    let elapsed = started.elapsed();

    assert_eq!(text.as_str(), "b x ".repeat(count));
    assert_eq!(text.runs().count(), 2 * count);
    let last = 4 * (count - 1);
    assert!(typeface_at(&text, 0).bold);
    assert!(!typeface_at(&text, 1).bold);
    assert!(typeface_at(&text, last).bold);
    assert!(!typeface_at(&text, last + 2).bold);
    assert!(elapsed.as_secs() < 30, "parse took {elapsed:?}");
}

#[test]
fn test_header() {
    let parser = MarkdownParser::new();
    let text = parser.parse("# Title\nbody");

    assert_eq!(text.as_str(), "Title\nbody");
    let title = typeface_at(&text, 0);
    assert!(title.bold);
    assert_eq!(title.size, 21.0);
    assert_eq!(typeface_at(&text, 6).size, 11.0);
}

#[test]
fn test_quote() {
    let parser = with_markup_line_starts();
    let text = parser.parse("> quoted");
    assert_eq!(text.as_str(), "│ quoted");
    assert!(typeface_at(&text, 0).italic);
}

#[test]
fn test_code_is_never_emphasized() {
    let parser = MarkdownParser::new();
    let text = parser.parse("see `**not bold**` and **bold**");

    assert_eq!(text.as_str(), "see **not bold** and bold");
    let code = typeface_at(&text, 4);
    assert_eq!(code.family, "monospace");
    assert!(!code.bold);
    assert!(typeface_at(&text, 21).bold);
}

#[test]
fn test_code_inside_underline_is_not_underlined() {
    let parser = MarkdownParser::new();
    let text = parser.parse("x ~~a `b` c~~");

    assert_eq!(text.as_str(), "x a b c");
    assert_eq!(text.attributes_at(2).unwrap().underline, Some(true));
    assert_eq!(text.attributes_at(4).unwrap().underline, Some(false));
    assert_eq!(text.attributes_at(6).unwrap().underline, Some(true));
}

#[test]
fn test_fenced_code_is_not_a_header() {
    let parser = with_markup_line_starts();
    let text = parser.parse("```sh\n# not a header\n- nor a list\n```");

    assert_eq!(text.as_str(), "# not a header\n- nor a list");
    let attributes = text.attributes_at(0).unwrap();
    assert_eq!(attributes.code_language.as_deref(), Some("sh"));
    assert!(!typeface_at(&text, 0).bold);
}

#[test]
fn test_backslash_escapes() {
    let parser = MarkdownParser::new();
    let text = parser.parse(r"an \*literal\* and C:\path");

    assert_eq!(text.as_str(), r"an *literal* and C:\path");
    assert!(!typeface_at(&text, 4).italic);
}

#[test]
fn test_links() {
    let parser = MarkdownParser::new();
    let text = parser.parse("read [the docs](https://docs.example.com) or www.example.com");

    assert_eq!(text.as_str(), "read the docs or www.example.com");
    let label = text.attributes_at(5).unwrap();
    assert_eq!(label.link.as_deref(), Some("https://docs.example.com"));
    assert_eq!(label.foreground, Some(Color::BLUE));

    let bare = text.attributes_at(17).unwrap();
    assert_eq!(bare.link.as_deref(), Some("http://www.example.com"));
}

#[test]
fn test_disabling_automatic_links() {
    let mut parser = MarkdownParser::new();
    parser.set_automatic_link_detection(false);
    let text = parser.parse("see www.example.com and [docs](http://docs.io)");

    assert_eq!(text.as_str(), "see www.example.com and docs");
    assert_eq!(text.attributes_at(4).unwrap().link, None);
    assert_eq!(text.attributes_at(4).unwrap().foreground, Some(Color::BLACK));
    assert_eq!(
        text.attributes_at(24).unwrap().link.as_deref(),
        Some("http://docs.io")
    );
}

#[test]
fn test_image() {
    let parser = MarkdownParser::new();
    let text = parser.parse("logo: ![logo](images/logo.png)");

    assert_eq!(text.as_str(), "logo: \u{FFFC}");
    let image = text.attributes_at(6).unwrap().image.clone().unwrap();
    assert_eq!(image.source, "images/logo.png");
    assert_eq!(image.alt, "logo");
}

#[test]
fn test_add_then_remove_custom_element() {
    let mut parser = MarkdownParser::new();
    let input = "ping @alice";
    let baseline = parser.parse(input);

    let mention: Arc<dyn Element> = Arc::new(CustomElement::styled(
        r"@(\w+)",
        Attributes::new().with_foreground(Color::BLUE),
    ));
    parser.add_custom_element(mention.clone());
    let styled = parser.parse(input);
    assert_eq!(styled.as_str(), "ping alice");
    assert_eq!(styled.attributes_at(5).unwrap().foreground, Some(Color::BLUE));
    assert_eq!(parser.custom_elements().count(), 1);

    parser.remove_custom_element(&mention);
    assert_eq!(parser.custom_elements().count(), 0);
    assert_eq!(parser.parse(input), baseline);

    parser.remove_custom_element(&mention);
    assert_eq!(parser.custom_elements().count(), 0);
}

#[test]
fn test_invalid_custom_pattern_degrades() {
    let mut parser = MarkdownParser::new();
    parser.add_custom_element(Arc::new(CustomElement::new("(unclosed", |_| {
        "never".to_string()
    })));

    let text = parser.parse("**still bold**");
    assert_eq!(text.as_str(), "still bold");
    assert!(typeface_at(&text, 0).bold);
    assert!(parser.check_patterns().is_err());
}

#[test]
fn test_parse_styled_keeps_underlay() {
    let red = Color::rgb(200, 0, 0);
    let input = StyledText::with_attributes(
        "plain **bold**",
        Attributes::new().with_foreground(red),
    );
    let parser = MarkdownParser::new();
    let text = parser.parse_styled(&input);

    assert_eq!(text.as_str(), "plain bold");
    let plain = text.attributes_at(0).unwrap();
    assert_eq!(plain.foreground, Some(red));
    assert_eq!(plain.typeface, Some(parser.options().typeface.clone()));
    assert!(typeface_at(&text, 6).bold);
}

#[test]
fn test_options_flow_into_elements() {
    let options = ParserOptions {
        foreground: Color::DARK_GRAY,
        typeface: stylemark::Typeface::new("Serif", 14.0),
        ..ParserOptions::default()
    };
    let parser = MarkdownParser::with_options(options);
    let text = parser.parse("*a* b");

    let italic = typeface_at(&text, 0);
    assert_eq!(italic.family, "Serif");
    assert_eq!(italic.size, 14.0);
    assert!(italic.italic);
    assert_eq!(text.attributes_at(2).unwrap().foreground, Some(Color::DARK_GRAY));
}

#[test]
fn test_parse_is_deterministic_across_threads() {
    let parser = MarkdownParser::new();
    let input = "# Head\n- item **bold**\n> quote with `code`";
    let expected = parser.parse(input);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| parser.parse(input)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
