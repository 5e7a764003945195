//! Question templates and the matcher they compile to.
//!
//! A template is a sequence of [`Element`]s over normalized words:
//!
//! ```text
//! T1  <trigger> [<category> [that]] <predicate> <object text>
//!         "what drugs treat asthma"
//! T2  <trigger> [<category> [that]] [does|do] <subject text> <predicate>
//!         "what disease does albuterol treat"
//! T3  <subject text> <predicate> (what|which) [<category>]
//!         "asthma is treated by what chemical substance"
//!
//! trigger = [tell [me]] (what|which) | find [[for] me]
//! ```
//!
//! Templates are compiled once into small backtracking programs. Matching
//! tries templates in order and returns the first that consumes the whole
//! question. Within a template, the first alternative that leads to a full
//! match wins: optional parts are tried present before absent, vocabulary
//! phrases longest first, and free text as long as possible.

use std::collections::HashMap;
use std::ops::Range;

use crate::vocabulary::Vocabulary;

/// The slot a matched phrase fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    SubjectCategory,
    ObjectCategory,
    SubjectName,
    ObjectName,
    Predicate,
}

impl Role {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        self as usize
    }
}

/// Which vocabulary a [`Element::Phrase`] draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexicon {
    Categories,
    Predicates,
}

/// One piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// A literal word.
    Word(&'static str),
    /// The first alternative that leads to a full match.
    Either(Vec<Vec<Element>>),
    /// A sequence that may be left out. Tried present first.
    Optional(Vec<Element>),
    /// Any phrase of a vocabulary, captured under a role.
    Phrase(Role, Lexicon),
    /// One or more arbitrary words, captured under a role.
    Text(Role),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub elements: Vec<Element>,
}

fn what() -> Element {
    Element::Either(vec![vec![Element::Word("what")], vec![Element::Word("which")]])
}

fn trigger() -> Element {
    Element::Either(vec![
        vec![
            Element::Optional(vec![
                Element::Word("tell"),
                Element::Optional(vec![Element::Word("me")]),
            ]),
            what(),
        ],
        vec![
            Element::Word("find"),
            Element::Optional(vec![
                Element::Optional(vec![Element::Word("for")]),
                Element::Word("me"),
            ]),
        ],
    ])
}

fn category_clause(role: Role) -> Element {
    Element::Optional(vec![
        Element::Phrase(role, Lexicon::Categories),
        Element::Optional(vec![Element::Word("that")]),
    ])
}

impl Template {
    /// The question forms, in matching order.
    pub fn questions() -> Vec<Template> {
        vec![
            // What drugs treat asthma?
            Template {
                elements: vec![
                    trigger(),
                    category_clause(Role::SubjectCategory),
                    Element::Phrase(Role::Predicate, Lexicon::Predicates),
                    Element::Text(Role::ObjectName),
                ],
            },
            // What disease does albuterol treat?
            Template {
                elements: vec![
                    trigger(),
                    category_clause(Role::ObjectCategory),
                    Element::Optional(vec![Element::Either(vec![
                        vec![Element::Word("does")],
                        vec![Element::Word("do")],
                    ])]),
                    Element::Text(Role::SubjectName),
                    Element::Phrase(Role::Predicate, Lexicon::Predicates),
                ],
            },
            // Asthma is treated by what chemical substance?
            Template {
                elements: vec![
                    Element::Text(Role::SubjectName),
                    Element::Phrase(Role::Predicate, Lexicon::Predicates),
                    what(),
                    Element::Optional(vec![Element::Phrase(
                        Role::ObjectCategory,
                        Lexicon::Categories,
                    )]),
                ],
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Instruction {
    Word(String),
    /// Try the first target, then the second.
    Split(usize, usize),
    Jump(usize),
    Phrase(Role, Lexicon),
    Text(Role),
    Match,
}

#[derive(Debug, Clone, Default)]
struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    fn compile(template: &Template) -> Self {
        let mut program = Program::default();
        program.emit_all(&template.elements);
        program.instructions.push(Instruction::Match);
        program
    }

    fn emit_all(&mut self, elements: &[Element]) {
        for element in elements {
            self.emit(element);
        }
    }

    fn emit(&mut self, element: &Element) {
        match element {
            Element::Word(word) => self.instructions.push(Instruction::Word(word.to_string())),
            Element::Phrase(role, lexicon) => {
                self.instructions.push(Instruction::Phrase(*role, *lexicon))
            }
            Element::Text(role) => self.instructions.push(Instruction::Text(*role)),
            Element::Optional(elements) => {
                let split = self.placeholder();
                self.emit_all(elements);
                self.instructions[split] = Instruction::Split(split + 1, self.here());
            }
            Element::Either(alternatives) => {
                let mut exits = Vec::new();
                let Some((last, rest)) = alternatives.split_last() else {
                    return;
                };
                for alternative in rest {
                    let split = self.placeholder();
                    self.emit_all(alternative);
                    exits.push(self.placeholder());
                    self.instructions[split] = Instruction::Split(split + 1, self.here());
                }
                self.emit_all(last);
                let end = self.here();
                for exit in exits {
                    self.instructions[exit] = Instruction::Jump(end);
                }
            }
        }
    }

    fn here(&self) -> usize {
        self.instructions.len()
    }

    fn placeholder(&mut self) -> usize {
        self.instructions.push(Instruction::Match);
        self.instructions.len() - 1
    }
}

/// Vocabulary phrases split into words and indexed by their first word.
#[derive(Debug, Clone, Default)]
struct PhraseIndex {
    by_first_word: HashMap<String, Vec<Vec<String>>>,
}

impl PhraseIndex {
    fn new<'a>(phrases: impl Iterator<Item = &'a str>) -> Self {
        let mut index = PhraseIndex::default();
        for phrase in phrases {
            let words: Vec<String> = phrase.split_whitespace().map(str::to_string).collect();
            if let Some(first) = words.first() {
                index
                    .by_first_word
                    .entry(first.clone())
                    .or_default()
                    .push(words);
            }
        }
        // Stable, so equal-length phrases keep vocabulary order.
        for candidates in index.by_first_word.values_mut() {
            candidates.sort_by_key(|words| std::cmp::Reverse(words.len()));
        }
        index
    }

    fn candidates(&self, word: &str) -> &[Vec<String>] {
        self.by_first_word
            .get(word)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

type Captures = [Option<Range<usize>>; Role::COUNT];

/// The result of matching a question against the templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    /// Position of the matching template, from zero.
    pub template: usize,
    words: Vec<String>,
    captures: Captures,
}

impl TemplateMatch {
    /// The words captured under a role, joined by spaces.
    pub fn get(&self, role: Role) -> Option<String> {
        self.captures[role.index()]
            .clone()
            .map(|range| self.words[range].join(" "))
    }
}

/// Templates compiled against a vocabulary.
#[derive(Debug, Clone)]
pub struct CompiledTemplates {
    programs: Vec<Program>,
    categories: PhraseIndex,
    predicates: PhraseIndex,
}

impl CompiledTemplates {
    pub fn compile(templates: &[Template], vocabulary: &Vocabulary) -> Self {
        CompiledTemplates {
            programs: templates.iter().map(Program::compile).collect(),
            categories: PhraseIndex::new(vocabulary.categories()),
            predicates: PhraseIndex::new(vocabulary.predicates()),
        }
    }

    /// Match normalized words against each template in turn.
    pub fn find(&self, words: &[String]) -> Option<TemplateMatch> {
        self.programs.iter().enumerate().find_map(|(template, program)| {
            let mut captures = Captures::default();
            let run = Run {
                templates: self,
                program,
                words,
            };
            run.step(0, 0, &mut captures).then(|| TemplateMatch {
                template,
                words: words.to_vec(),
                captures,
            })
        })
    }

    fn lexicon(&self, lexicon: Lexicon) -> &PhraseIndex {
        match lexicon {
            Lexicon::Categories => &self.categories,
            Lexicon::Predicates => &self.predicates,
        }
    }
}

struct Run<'a> {
    templates: &'a CompiledTemplates,
    program: &'a Program,
    words: &'a [String],
}

impl Run<'_> {
    /// Run from instruction `pc` at word `position`. On success `captures`
    /// holds the match; on failure it is left as it was.
    fn step(&self, pc: usize, position: usize, captures: &mut Captures) -> bool {
        let Some(instruction) = self.program.instructions.get(pc) else {
            return false;
        };
        match instruction {
            Instruction::Match => position == self.words.len(),
            Instruction::Word(word) => {
                self.words.get(position) == Some(word) && self.step(pc + 1, position + 1, captures)
            }
            Instruction::Jump(target) => self.step(*target, position, captures),
            Instruction::Split(first, second) => {
                self.step(*first, position, captures) || self.step(*second, position, captures)
            }
            Instruction::Phrase(role, lexicon) => {
                let Some(word) = self.words.get(position) else {
                    return false;
                };
                let candidates = self.templates.lexicon(*lexicon).candidates(word);
                for phrase in candidates {
                    let end = position + phrase.len();
                    if self.words.get(position..end) == Some(phrase.as_slice())
                        && self.capture(*role, position..end, pc, captures)
                    {
                        return true;
                    }
                }
                false
            }
            Instruction::Text(role) => {
                for end in (position + 1..=self.words.len()).rev() {
                    if self.capture(*role, position..end, pc, captures) {
                        return true;
                    }
                }
                false
            }
        }
    }

    fn capture(
        &self,
        role: Role,
        range: Range<usize>,
        pc: usize,
        captures: &mut Captures,
    ) -> bool {
        let end = range.end;
        let previous = captures[role.index()].replace(range);
        if self.step(pc + 1, end, captures) {
            return true;
        }
        captures[role.index()] = previous;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;
    use crate::vocabulary::GrammarTables;
    use pretty_assertions::assert_eq;

    fn templates() -> CompiledTemplates {
        let tables = GrammarTables::from_json(
            r#"{"related to": "is related to", "treated by": "is treated by"}"#,
            r#"{"chemical substance": ["chemical"]}"#,
        )
        .unwrap();
        let vocabulary = Vocabulary::from_terms(
            ["chemical substance", "drug", "disease"],
            ["related to", "treats", "treated by", "affects", "affects expression of"],
            tables,
        )
        .unwrap();
        CompiledTemplates::compile(&Template::questions(), &vocabulary)
    }

    fn find(question: &str) -> Option<TemplateMatch> {
        templates().find(&tokenize(question))
    }

    #[test]
    fn compiles_optional_and_either() {
        let program = Program::compile(&Template {
            elements: vec![
                Element::Either(vec![vec![Element::Word("a")], vec![Element::Word("b")]]),
                Element::Optional(vec![Element::Word("c")]),
            ],
        });
        assert_eq!(program.instructions, vec![
            Instruction::Split(1, 3),
            Instruction::Word("a".into()),
            Instruction::Jump(4),
            Instruction::Word("b".into()),
            Instruction::Split(5, 6),
            Instruction::Word("c".into()),
            Instruction::Match,
        ]);
    }

    #[test]
    fn category_first_question() {
        let found = find("What drugs treat asthma?").unwrap();
        assert_eq!(found.template, 0);
        assert_eq!(found.get(Role::SubjectCategory).as_deref(), Some("drugs"));
        assert_eq!(found.get(Role::Predicate).as_deref(), Some("treat"));
        assert_eq!(found.get(Role::ObjectName).as_deref(), Some("asthma"));
    }

    #[test]
    fn triggers_and_that() {
        for question in [
            "Find me a chemical substance that treats asthma.",
            "Find for me chemical substance that treats asthma",
            "Tell me which chemical substance treats asthma",
            "tell what chemical substance treats asthma",
        ] {
            let found = find(question).unwrap();
            assert_eq!(found.template, 0, "{question}");
            assert_eq!(
                found.get(Role::SubjectCategory).as_deref(),
                Some("chemical substance"),
                "{question}"
            );
            assert_eq!(found.get(Role::ObjectName).as_deref(), Some("asthma"));
        }
    }

    #[test]
    fn name_first_question() {
        let found = find("What disease does albuterol treat?").unwrap();
        assert_eq!(found.template, 1);
        assert_eq!(found.get(Role::ObjectCategory).as_deref(), Some("disease"));
        assert_eq!(found.get(Role::SubjectName).as_deref(), Some("albuterol"));
        assert_eq!(found.get(Role::Predicate).as_deref(), Some("treat"));
        assert_eq!(found.get(Role::SubjectCategory), None);
    }

    #[test]
    fn plural_auxiliary() {
        let found = find("What diseases do statins treat?").unwrap();
        assert_eq!(found.template, 1);
        assert_eq!(found.get(Role::ObjectCategory).as_deref(), Some("diseases"));
        assert_eq!(found.get(Role::SubjectName).as_deref(), Some("statins"));
        assert_eq!(found.get(Role::Predicate).as_deref(), Some("treat"));
    }

    #[test]
    fn trailing_question_word() {
        let found = find("Asthma is treated by which chemical substance?").unwrap();
        assert_eq!(found.template, 2);
        assert_eq!(found.get(Role::SubjectName).as_deref(), Some("asthma"));
        assert_eq!(found.get(Role::Predicate).as_deref(), Some("is treated by"));
        assert_eq!(
            found.get(Role::ObjectCategory).as_deref(),
            Some("chemical substance")
        );

        let found = find("albuterol treats what").unwrap();
        assert_eq!(found.template, 2);
        assert_eq!(found.get(Role::ObjectCategory), None);
    }

    #[test]
    fn earlier_templates_win() {
        // Both the first and the second form fit; the first is reported.
        let found = find("what drug treats treats").unwrap();
        assert_eq!(found.template, 0);
        assert_eq!(found.get(Role::ObjectName).as_deref(), Some("treats"));
    }

    #[test]
    fn longer_phrases_are_preferred() {
        let found = find("what drug affects expression of brca1").unwrap();
        assert_eq!(
            found.get(Role::Predicate).as_deref(),
            Some("affects expression of")
        );
        assert_eq!(found.get(Role::ObjectName).as_deref(), Some("brca1"));
    }

    #[test]
    fn backtracks_to_shorter_phrases() {
        // The longer predicate leaves no words for the object.
        let found = find("what drug affects expression of").unwrap();
        assert_eq!(found.get(Role::Predicate).as_deref(), Some("affects"));
        assert_eq!(found.get(Role::ObjectName).as_deref(), Some("expression of"));
    }

    #[test]
    fn free_text_is_greedy() {
        let found = find("what treats is related to what").unwrap();
        assert_eq!(found.template, 0);
        assert_eq!(
            found.get(Role::ObjectName).as_deref(),
            Some("is related to what")
        );
    }

    #[test]
    fn unmatched_questions() {
        assert_eq!(find("What aaagggh?"), None);
        assert_eq!(find(""), None);
        assert_eq!(find("find me"), None);
    }
}
