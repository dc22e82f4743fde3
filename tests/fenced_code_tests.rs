use fencemark::{Event, Phase, TokenType, check_balance, tokenize};

fn events(input: &str) -> Vec<Event> {
    let events = tokenize(input).unwrap();
    assert_eq!(check_balance(&events), Ok(()), "unbalanced: {input:?}");
    events
}

fn slices(input: &str, kind: TokenType) -> Vec<&str> {
    events(input)
        .iter()
        .filter(|e| e.is_enter(kind))
        .map(|e| e.token.slice(input))
        .collect()
}

fn code_lines(input: &str) -> Vec<&str> {
    slices(input, TokenType::CodeLineData)
}

fn has(input: &str, kind: TokenType) -> bool {
    events(input).iter().any(|e| e.is_enter(kind))
}

#[test]
fn test_info_and_content() {
    let input = "```js\ncode\n```";
    assert_eq!(slices(input, TokenType::FencedCodeFenceStart), ["```js"]);
    assert_eq!(slices(input, TokenType::FencedCodeFenceInfo), ["js"]);
    assert_eq!(code_lines(input), ["code"]);
    assert_eq!(slices(input, TokenType::FencedCodeFenceEnd), ["```"]);
}

#[test]
fn test_two_backticks_are_not_a_fence() {
    let input = "``\nx\n``";
    assert!(!has(input, TokenType::FencedCode));
    assert_eq!(slices(input, TokenType::Content), ["``", "x", "``"]);
}

#[test]
fn test_closing_marker_must_match() {
    let input = "~~~\n```\n~~~";
    assert_eq!(code_lines(input), ["```"]);
    assert_eq!(slices(input, TokenType::FencedCodeFenceEnd), ["~~~"]);

    let input = "```\nx\n~~~";
    assert_eq!(code_lines(input), ["x", "~~~"]);
    assert!(!has(input, TokenType::FencedCodeFenceEnd));
}

#[test]
fn test_unclosed_block_ends_at_eof() {
    let input = "```\nabc";
    assert_eq!(code_lines(input), ["abc"]);
    assert!(!has(input, TokenType::FencedCodeFenceEnd));

    let all = events(input);
    let last = all.last().unwrap();
    assert!(last.is_exit(TokenType::FencedCode));
    assert_eq!(last.token.end.unwrap().offset, input.len());
}

#[test]
fn test_indented_fence_strips_content() {
    let input = "   ```\n   code\n   ```";
    assert_eq!(code_lines(input), ["code"]);
    assert_eq!(slices(input, TokenType::LinePrefix), ["   ", "   ", "   "]);
    assert!(has(input, TokenType::FencedCodeFenceEnd));
}

#[test]
fn test_excess_indentation_is_kept() {
    let input = "  ```\n    x\n y\n```";
    assert_eq!(code_lines(input), ["  x", "y"]);
}

#[test]
fn test_unindented_fence_keeps_all_whitespace() {
    let input = "```\n  x\n```";
    assert_eq!(code_lines(input), ["  x"]);
    assert!(slices(input, TokenType::LinePrefix).is_empty());
}

#[test]
fn test_closing_length() {
    // Shorter never closes.
    let input = "````\n```\n";
    assert_eq!(code_lines(input), ["```"]);
    assert!(!has(input, TokenType::FencedCodeFenceEnd));

    // Equal or longer closes.
    assert!(has("````\n````", TokenType::FencedCodeFenceEnd));
    assert_eq!(
        slices("```\nx\n`````", TokenType::FencedCodeFenceEnd),
        ["`````"]
    );
}

#[test]
fn test_text_after_closing_sequence() {
    let input = "```\n``` x\n```";
    assert_eq!(code_lines(input), ["``` x"]);
    assert_eq!(slices(input, TokenType::FencedCodeFenceEnd), ["```"]);
}

#[test]
fn test_trailing_whitespace_after_closing_sequence() {
    let input = "```\nx\n```  \t\nafter";
    assert_eq!(slices(input, TokenType::FencedCodeFenceEnd), ["```  \t"]);
    assert_eq!(slices(input, TokenType::Content), ["after"]);
}

#[test]
fn test_closing_fence_indentation() {
    assert!(has("```\n   ```", TokenType::FencedCodeFenceEnd));
    assert!(!has("```\n    ```", TokenType::FencedCodeFenceEnd));
    assert!(!has("```\n\t```", TokenType::FencedCodeFenceEnd));
}

#[test]
fn test_backtick_in_info() {
    assert!(!has("``` a`b\n", TokenType::FencedCode));
    assert!(!has("``` js a`b\n", TokenType::FencedCode));

    let input = "~~~ a`b\n~~~";
    assert!(has(input, TokenType::FencedCode));
    assert_eq!(slices(input, TokenType::FencedCodeFenceInfo), ["a`b"]);
}

#[test]
fn test_info_and_meta() {
    let input = "``` js  eval x \n1\n```";
    assert_eq!(slices(input, TokenType::FencedCodeFenceInfo), ["js"]);
    assert_eq!(slices(input, TokenType::FencedCodeFenceMeta), ["eval x "]);
    assert_eq!(
        slices(input, TokenType::FencedCodeFenceWhitespace),
        [" ", "  "]
    );
}

#[test]
fn test_info_refined_into_data() {
    let input = "~~~ rust\n~~~";
    let all = events(input);
    let kinds: Vec<String> = all
        .iter()
        .map(|e| match e.phase {
            Phase::Enter => format!("enter {}", e.token.kind),
            Phase::Exit => format!("exit {}", e.token.kind),
        })
        .collect();
    let info = kinds
        .iter()
        .position(|k| k == "enter fencedCodeFenceInfo")
        .unwrap();
    assert_eq!(
        &kinds[info..info + 4],
        [
            "enter fencedCodeFenceInfo",
            "enter data",
            "exit data",
            "exit fencedCodeFenceInfo",
        ]
    );
}

#[test]
fn test_blank_lines_inside_block() {
    let input = "```\n\n  \n```";
    assert_eq!(code_lines(input), ["  "]);
    assert_eq!(slices(input, TokenType::CodeLineFeed).len(), 2);
}

#[test]
fn test_multiple_blocks() {
    let input = "```a\n1\n```\ntext\n~~~b\n2\n~~~\n";
    assert_eq!(slices(input, TokenType::FencedCodeFenceInfo), ["a", "b"]);
    assert_eq!(code_lines(input), ["1", "2"]);
    assert_eq!(slices(input, TokenType::Content), ["text"]);
}

#[test]
fn test_event_display() {
    let lines: Vec<String> = events("```\n```").iter().map(|e| e.to_string()).collect();
    assert_eq!(lines.first().unwrap(), "enter fencedCode 1:1-2:4");
    assert_eq!(lines.last().unwrap(), "exit fencedCode 1:1-2:4");
}
