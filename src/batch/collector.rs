//! # 测试集文件收集
//!
//! 根据输入路径和 glob 模式收集测试集定义文件。
//!
//! - 单文件输入直接返回
//! - 目录输入按模式匹配文件名，可递归
//! - 结果按路径排序，保证输出顺序稳定
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{QdeckError, Result};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct FileCollector {
    input: PathBuf,
    patterns: Vec<glob::Pattern>,
    recursive: bool,
}

impl FileCollector {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            patterns: Vec::new(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| {
                    QdeckError::InvalidArgument(format!("Invalid pattern '{}': {}", p, e))
                })
            })
            .collect::<Result<_>>()?;
        Ok(self)
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件；输入不存在时报错
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }

        if !self.input.is_dir() {
            return Err(QdeckError::FileNotFound {
                path: self.input.display().to_string(),
            });
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        Ok(files)
    }

    fn matches(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("qdeck-collector-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("nested")).unwrap();
        dir
    }

    #[test]
    fn test_collect_with_patterns() {
        let dir = scratch_dir("patterns");
        for name in ["b.json", "a.json", "notes.txt", "nested/c.json"] {
            fs::write(dir.join(name), "{}").unwrap();
        }

        let flat = FileCollector::new(&dir).with_pattern("*.json").unwrap().collect().unwrap();
        let names: Vec<_> = flat.iter().filter_map(|p| p.file_name()?.to_str()).collect();
        assert_eq!(names, ["a.json", "b.json"]);

        let deep = FileCollector::new(&dir)
            .with_pattern("*.json, *.txt")
            .unwrap()
            .recursive(true)
            .collect()
            .unwrap();
        assert_eq!(deep.len(), 4);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_single_file_and_missing_input() {
        let dir = scratch_dir("single");
        let file = dir.join("suite.json");
        fs::write(&file, "{}").unwrap();

        assert_eq!(FileCollector::new(&file).collect().unwrap(), [file.clone()]);
        assert!(FileCollector::new(dir.join("missing")).collect().is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(FileCollector::new(".").with_pattern("[").is_err());
    }
}
