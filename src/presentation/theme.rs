use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub label: fn(&str) -> String,
    pub value: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub idx: fn(&str) -> String,
    pub ok: fn(&str) -> String,
    pub warn: fn(&str) -> String,
    pub bad: fn(&str) -> String,
    pub muted: fn(&str) -> String,
    #[allow(dead_code)]
    pub accent: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "temp" | "" => Self::temp(),
            "slate" => Self::slate(),
            "canvas" => Self::canvas(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::temp() // Fallback to default
            }
        }
    }

    fn temp() -> Self {
        Self {
            title: |s| s.bright_magenta().italic().bold().underline().to_string(),
            label: |s| s.cyan().to_string(),
            value: |s| s.white().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.bright_white().to_string(),
            ok: |s| s.green().to_string(),
            warn: |s| s.yellow().to_string(),
            bad: |s| s.red().to_string(),
            muted: |s| s.bright_white().dimmed().italic().to_string(),
            accent: |s| s.cyan().italic().to_string(),
        }
    }

    fn slate() -> Self {
        Self {
            title: |s| s.blue().bold().underline().to_string(),
            label: |s| s.normal().to_string(),
            value: |s| s.bright_white().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.cyan().to_string(),
            ok: |s| s.bright_green().to_string(),
            warn: |s| s.bright_yellow().to_string(),
            bad: |s| s.bright_red().bold().to_string(),
            muted: |s| s.bright_black().italic().to_string(),
            accent: |s| s.green().italic().to_string(),
        }
    }

    fn canvas() -> Self {
        Self {
            title: |s| s.red().italic().bold().underline().to_string(),
            label: |s| s.bright_cyan().bold().to_string(),
            value: |s| s.black().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.bright_white().to_string(),
            ok: |s| s.green().bold().to_string(),
            warn: |s| s.yellow().bold().to_string(),
            bad: |s| s.red().bold().to_string(),
            muted: |s| s.bright_black().italic().to_string(),
            accent: |s| s.magenta().to_string(),
        }
    }
}
