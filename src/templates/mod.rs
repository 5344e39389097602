pub mod style_files;

use crate::model::AssignmentConfig;

/// Filename stem of the driver document (`TMA` → `TMA.tex`).
pub fn driver_stem(config: &AssignmentConfig) -> &str {
    &config.basename
}

pub fn question_stem(question: usize) -> String {
    format!("q{question}")
}

/// Part labels go in verbatim, case preserved: question 1 part `b` → `q1b`.
pub fn part_stem(question: usize, part: &str) -> String {
    format!("q{question}{part}")
}

/// Subpart indices are 0-based: question 2, part `b`, second subpart → `q2b_1`.
pub fn subpart_stem(question: usize, part: &str, index: usize) -> String {
    format!("q{question}{part}_{index}")
}

pub fn tex_file(stem: &str) -> String {
    format!("{stem}.tex")
}

/// Returns the driver document that pulls in every question file in order.
pub fn driver_tex(config: &AssignmentConfig, question_count: usize) -> String {
    let stems: Vec<String> = (1..=question_count).map(question_stem).collect();

    let mut lines = vec![
        format!("% File: {}.tex", driver_stem(config)),
        "% This is the MAIN document file - DO NOT EDIT!".to_string(),
        "% This file is auto-generated and controls the overall document structure.".to_string(),
        "% To add your answers, edit the individual question part files (e.g., q1a.tex, q1b.tex)"
            .to_string(),
        String::new(),
        r"\documentclass[a4paper,12pt]{article}".to_string(),
        format!(r"\usepackage{{{}}}", config.style),
        format!(r"\myname{{{}}}", config.name),
        format!(r"\mypin{{{}}}", config.pin),
        format!(r"\mycourse{{{}}}", config.course),
        format!(r"\mytma{{{}}}", config.tma_ref),
        format!(r"\mycod{{{}}}", config.cod),
        String::new(),
        format!(r"\includeonly{{{}}}", stems.join(",")),
        String::new(),
        r"\begin{document}".to_string(),
    ];
    lines.extend(stems.iter().map(|stem| format!(r"\include{{{stem}}}")));
    lines.push(r"\end{document}".to_string());

    lines.join("\n")
}

/// Returns a question file: one part marker and input per declared part.
pub fn question_tex(config: &AssignmentConfig, question: usize, parts: &[String]) -> String {
    let mut lines = vec![
        format!("% !TeX root = ./{}.tex", driver_stem(config)),
        format!("% File: q{question}.tex"),
        "% This is a STRUCTURE file - DO NOT EDIT!".to_string(),
        "% This file controls the layout of question parts.".to_string(),
        format!(
            "% To add your answers, edit the individual part files (q{question}a.tex, q{question}b.tex, etc.)"
        ),
        "% Generated by tmagen".to_string(),
        String::new(),
        r"\begin{question}".to_string(),
    ];
    for part in parts {
        lines.push(format!(r"\qpart %({part})"));
        lines.push(format!(r"\input{{{}}}", part_stem(question, part)));
    }
    lines.push(r"\end{question}".to_string());

    lines.join("\n")
}

/// Returns the answer file for one part.
pub fn part_tex(config: &AssignmentConfig, question: usize, part: &str) -> String {
    [
        format!("% !TeX root = ./{}.tex", driver_stem(config)),
        format!("% File: {}", tex_file(&part_stem(question, part))),
        "% This is an ANSWER file - EDIT THIS!".to_string(),
        format!("% Add your answer for Question {question} part ({part}) below."),
        "% You can use LaTeX commands, equations, figures, etc.".to_string(),
        "% Generated by tmagen".to_string(),
        String::new(),
        "% Add your answer here:".to_string(),
        String::new(),
    ]
    .join("\n")
}

/// Returns the block appended to a part file that has subparts.
pub fn subpart_block(question: usize, part: &str, count: usize) -> String {
    let mut lines = vec![String::new()];
    for index in 0..count {
        lines.push(r"\qsubpart".to_string());
        lines.push(format!(r"\input{{{}}}", subpart_stem(question, part, index)));
    }
    lines.join("\n")
}

/// Returns the answer file for one subpart; `index` is 0-based.
pub fn subpart_tex(config: &AssignmentConfig, question: usize, part: &str, index: usize) -> String {
    [
        format!("% !TeX root = ./{}.tex", driver_stem(config)),
        format!("% File: {}", tex_file(&subpart_stem(question, part, index))),
        "% This is a SUBPART ANSWER file - EDIT THIS!".to_string(),
        format!("% Add your answer for subpart {} here.", index + 1),
        "% You can use LaTeX commands, equations, figures, etc.".to_string(),
        "% Generated by tmagen".to_string(),
        String::new(),
        "% Add your answer here:".to_string(),
        String::new(),
    ]
    .join("\n")
}
