//! Embedded style files, used whenever the configured style source cannot
//! supply them.

/// Name of the primary style resource.
pub const TMA_STY: &str = "tma.sty";

/// Name of the secondary style resource.
pub const TMA_EXTRAS_STY: &str = "tma-extras.sty";

/// Basic `tma.sty`: page geometry, question/part/subpart counters and the
/// identity commands the driver file sets.
pub fn tma_sty() -> &'static str {
    r"%% File: tma.sty
%% Basic TMA style file
\NeedsTeXFormat{LaTeX2e}
\ProvidesPackage{tma}[2025/09/27 tma package]

% Basic packages
\RequirePackage{fancyhdr}
\RequirePackage{amsmath,amssymb}
\RequirePackage{geometry}

% Geometry settings
\geometry{
    headheight=10mm,
    headsep=5mm,
    bottom=25mm,
    footskip=15mm,
    lmargin=30mm,
    rmargin=5mm
}

% Question counters
\newcounter{question}
\newcounter{qpart}[question]
\newcounter{qsubpart}[qpart]

% User information commands
\newcommand{\name}{\relax}
\newcommand{\tma}{\relax}
\newcommand{\course}{\relax}
\newcommand{\pin}{\relax}
\newcommand{\cod}{\relax}

\newcommand{\myname}[1]{\renewcommand{\name}{#1}}
\newcommand{\mytma}[1]{\renewcommand{\tma}{#1}}
\newcommand{\mycourse}[1]{\renewcommand{\course}{#1}}
\newcommand{\mypin}[1]{\renewcommand{\pin}{#1}}
\newcommand{\mycod}[1]{\renewcommand{\cod}{#1}}

% Question environment
\newenvironment{question}[1][0]{%
    \stepcounter{question}%
    \makebox[0pt][r]{\large{Q \thequestion .\quad}}\par%
    \setcounter{page}{1}%
}{%
    \par \vspace{3em}%
}

\newcommand{\qpart}[1][0]{%
    \stepcounter{qpart}\par%
    \makebox[0pt][r]{\large{(\alph{qpart})\quad}}%
}

\newcommand{\qsubpart}[1][0]{%
    \stepcounter{qsubpart}\par%
    \makebox[0pt][r]{\large{(\roman{qsubpart})\quad}}%
}

% Page style
\pagestyle{fancy}
\lhead{\textrm{\name\ \pin}}
\chead{\textrm{\course\ TMA-\tma}}
\rhead{\textrm{Due: \cod}}

\endinput"
}

/// Minimal `tma-extras.sty`.
pub fn tma_extras_sty() -> &'static str {
    "% TMA Extras style file\n\\endinput"
}

/// Fallback content for a named style resource, if it is one we embed.
pub fn fallback(name: &str) -> Option<&'static str> {
    match name {
        TMA_STY => Some(tma_sty()),
        TMA_EXTRAS_STY => Some(tma_extras_sty()),
        _ => None,
    }
}
