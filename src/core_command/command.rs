#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum BrowseCommand {
    Bye,
    Pwd,
    Dir,
    Cd,
    Download,
}

impl BrowseCommand {
    pub fn parse(keyword: &str) -> Option<BrowseCommand> {
        match keyword.to_ascii_uppercase().as_str() {
            "BYE" => Some(BrowseCommand::Bye),
            "PWD" => Some(BrowseCommand::Pwd),
            "DIR" => Some(BrowseCommand::Dir),
            "CD" => Some(BrowseCommand::Cd),
            "DOWNLOAD" => Some(BrowseCommand::Download),
            _ => None,
        }
    }

    /// Whether the command is meaningless without an argument.
    pub fn takes_argument(self) -> bool {
        matches!(self, BrowseCommand::Cd | BrowseCommand::Download)
    }
}

/// One request line split into its keyword and the trimmed remainder.
#[derive(Debug, PartialEq, Eq)]
pub struct Request<'a> {
    pub command: Option<BrowseCommand>,
    pub keyword: &'a str,
    pub argument: &'a str,
}

impl<'a> Request<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let (keyword, argument) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        Request {
            command: BrowseCommand::parse(keyword),
            keyword,
            argument,
        }
    }

    /// Returns the command when it can be executed as written: known keyword
    /// and, for `CD`/`DOWNLOAD`, a non-empty argument.
    pub fn executable(&self) -> Option<BrowseCommand> {
        self.command
            .filter(|command| !command.takes_argument() || !self.argument.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(BrowseCommand::parse("pwd"), Some(BrowseCommand::Pwd));
        assert_eq!(BrowseCommand::parse("Dir"), Some(BrowseCommand::Dir));
        assert_eq!(BrowseCommand::parse("BYE"), Some(BrowseCommand::Bye));
        assert_eq!(BrowseCommand::parse("download"), Some(BrowseCommand::Download));
        assert_eq!(BrowseCommand::parse("FOO"), None);
        assert_eq!(BrowseCommand::parse(""), None);
    }

    #[test]
    fn test_argument_is_the_trimmed_remainder() {
        let request = Request::parse("CD   My Documents  ");
        assert_eq!(request.command, Some(BrowseCommand::Cd));
        assert_eq!(request.keyword, "CD");
        assert_eq!(request.argument, "My Documents");

        let request = Request::parse("download\treport final.txt");
        assert_eq!(request.command, Some(BrowseCommand::Download));
        assert_eq!(request.argument, "report final.txt");
    }

    #[test]
    fn test_blank_and_unknown_lines() {
        let request = Request::parse("   ");
        assert_eq!(request.command, None);
        assert_eq!(request.executable(), None);

        let request = Request::parse("FOO bar");
        assert_eq!(request.keyword, "FOO");
        assert_eq!(request.executable(), None);
    }

    #[test]
    fn test_missing_argument_is_not_executable() {
        assert_eq!(Request::parse("CD").executable(), None);
        assert_eq!(Request::parse("DOWNLOAD   ").executable(), None);
        assert_eq!(Request::parse("PWD").executable(), Some(BrowseCommand::Pwd));
        assert_eq!(Request::parse("DIR extra").executable(), Some(BrowseCommand::Dir));
        assert_eq!(Request::parse("CD ..").executable(), Some(BrowseCommand::Cd));
    }
}
