use std::borrow::Cow;
use std::ops::Range;

use regex::Regex;

use super::error::RenameError;

/// 替换标识与查找标识之间的关系
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameKind {
    /// 替换标识以查找标识结尾，即增加了前缀
    Prefix { prefix: String },
    /// 替换标识以查找标识开头，即增加了后缀
    Suffix { suffix: String },
    /// 查找标识位于替换标识中间，同时增加了前缀和后缀
    PrefixAndSuffix { prefix: String, suffix: String },
    /// 两者没有包含关系
    Literal,
}

impl RenameKind {
    /// 按优先级判断重命名类型
    pub fn detect(find: &str, replace: &str) -> Self {
        if let Some(prefix) = replace.strip_suffix(find) {
            RenameKind::Prefix {
                prefix: prefix.to_string(),
            }
        } else if let Some(suffix) = replace.strip_prefix(find) {
            RenameKind::Suffix {
                suffix: suffix.to_string(),
            }
        } else if let (Some(first), Some(last)) = (replace.find(find), replace.rfind(find)) {
            RenameKind::PrefixAndSuffix {
                prefix: replace[..first].to_string(),
                suffix: replace[last + find.len()..].to_string(),
            }
        } else {
            RenameKind::Literal
        }
    }

    /// 用于日志的说明文字
    pub fn description(&self) -> &'static str {
        match self {
            RenameKind::Prefix { .. } => "检测到增加前缀的重命名",
            RenameKind::Suffix { .. } => "检测到增加后缀的重命名",
            RenameKind::PrefixAndSuffix { .. } => "检测到同时增加前缀和后缀的重命名",
            RenameKind::Literal => "检测到无前缀或后缀的重命名",
        }
    }

    fn prefix(&self) -> Option<&str> {
        match self {
            RenameKind::Prefix { prefix } | RenameKind::PrefixAndSuffix { prefix, .. } => {
                Some(prefix)
            }
            _ => None,
        }
    }

    fn suffix(&self) -> Option<&str> {
        match self {
            RenameKind::Suffix { suffix } | RenameKind::PrefixAndSuffix { suffix, .. } => {
                Some(suffix)
            }
            _ => None,
        }
    }
}

/// 重命名规则
///
/// 规则在启动时构建一次，之后文件内容、文件名和目录名都使用同一个实例匹配，
/// 保证各处的匹配语义一致。
///
/// 匹配等价于 `(?<!前缀)查找标识(?!后缀)`：`regex` 不支持环视，
/// 因此前缀和后缀作为字面量在原始文本上检查，被拒绝的候选位置向后移动一个字符继续查找。
#[derive(Debug, Clone)]
pub struct RenameRule {
    find_token: String,
    replace_token: String,
    kind: RenameKind,
    matcher: Regex,
}

impl RenameRule {
    /// 根据查找标识和替换标识构建规则
    pub fn build(find: &str, replace: &str) -> Result<Self, RenameError> {
        if find.is_empty() {
            return Err(RenameError::EmptyFindToken);
        }

        let kind = RenameKind::detect(find, replace);
        let matcher = Regex::new(&regex::escape(find))?;

        Ok(Self {
            find_token: find.to_string(),
            replace_token: replace.to_string(),
            kind,
            matcher,
        })
    }

    pub fn find_token(&self) -> &str {
        &self.find_token
    }

    pub fn replace_token(&self) -> &str {
        &self.replace_token
    }

    pub fn kind(&self) -> &RenameKind {
        &self.kind
    }

    /// 检查文本中是否存在需要替换的位置
    pub fn is_match(&self, text: &str) -> bool {
        self.find_at(text, 0).is_some()
    }

    /// 替换所有匹配位置，替换标识按字面量插入
    pub fn replace_all<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let mut output: Option<String> = None;
        let mut last = 0;

        while let Some(range) = self.find_at(text, last) {
            let buffer = output.get_or_insert_with(|| String::with_capacity(text.len()));
            buffer.push_str(&text[last..range.start]);
            buffer.push_str(&self.replace_token);
            last = range.end;
        }

        match output {
            Some(mut buffer) => {
                buffer.push_str(&text[last..]);
                Cow::Owned(buffer)
            }
            None => Cow::Borrowed(text),
        }
    }

    /// 从 `start` 开始查找下一个被接受的匹配
    fn find_at(&self, text: &str, mut start: usize) -> Option<Range<usize>> {
        while start <= text.len() {
            let candidate = self.matcher.find_at(text, start)?;

            if self.accepts(text, candidate.start(), candidate.end()) {
                return Some(candidate.range());
            }

            // 查找标识非空，候选位置必然有一个字符
            let width = text[candidate.start()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            start = candidate.start() + width;
        }

        None
    }

    fn accepts(&self, text: &str, start: usize, end: usize) -> bool {
        let preceded = self
            .kind
            .prefix()
            .map_or(false, |prefix| text[..start].ends_with(prefix));
        let followed = self
            .kind
            .suffix()
            .map_or(false, |suffix| text[end..].starts_with(suffix));

        !preceded && !followed
    }
}
