// Route table: 경로 → 핸들러 정적 매핑
// Route table: static mapping from URL path to handler
//
// 서버 시작 시 한 번 구성하고, 이후에는 Arc로 공유하여 읽기 전용으로 사용
// Built once at startup, then shared behind an Arc and only read

use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// 라우트 테이블 에러
/// Route table errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// 같은 이름이 이미 등록됨
    /// Name already registered
    #[error("Route name already registered: {name}")]
    DuplicateName { name: String },

    /// 같은 경로가 이미 등록됨
    /// Path already registered
    #[error("Route path already registered: {path}")]
    DuplicatePath { path: String },

    /// 경로 패턴 형식 오류
    /// Malformed path pattern
    #[error("Invalid route pattern {path}: {reason}")]
    InvalidPattern { path: String, reason: &'static str },

    /// 일치하는 경로 없음 (404)
    /// No registered path matches (404)
    #[error("Not found: {path}")]
    NoMatch { path: String },

    /// 등록되지 않은 라우트 이름
    /// Unknown route name
    #[error("Unknown route name: {name}")]
    UnknownRouteName { name: String },
}

/// 트레일링 슬래시 처리 정책
/// Trailing slash policy for requests that miss the `/` convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingSlash {
    /// 슬래시를 붙이거나 떼면 일치할 때 정식 경로로 리다이렉트
    /// Redirect to the canonical path when adding/removing `/` matches
    #[default]
    Redirect,
    /// 정확히 일치하지 않으면 404
    /// Anything but an exact match is a 404
    Strict,
}

impl FromStr for TrailingSlash {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redirect" => Ok(TrailingSlash::Redirect),
            "strict" => Ok(TrailingSlash::Strict),
            other => Err(format!("expected 'redirect' or 'strict', got '{}'", other)),
        }
    }
}

/// 라우트 하나 (경로 패턴, 이름, 핸들러 참조)
/// One binding
#[derive(Debug, Clone)]
pub struct Route<H> {
    path: String,
    name: String,
    handler: H,
}

impl<H> Route<H> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// resolve 결과
/// Outcome of a successful lookup
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved<'a, H> {
    /// 정확히 일치하는 핸들러
    /// Exact match
    Handler(&'a H),
    /// 정식 경로로 리다이렉트 필요 (TrailingSlash::Redirect 일 때만)
    /// Canonical path to redirect to (only under `TrailingSlash::Redirect`)
    Redirect(&'a str),
}

/// 라우트 테이블
/// Ordered, immutable-after-startup set of routes.
///
/// 경로 매칭은 정확한 문자열 비교 (동적 세그먼트 없음).
/// HTTP 메서드 검사는 핸들러의 책임 (405).
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
    by_path: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    trailing_slash: TrailingSlash,
}

impl<H> RouteTable<H> {
    pub fn new(trailing_slash: TrailingSlash) -> Self {
        Self {
            routes: Vec::new(),
            by_path: HashMap::new(),
            by_name: HashMap::new(),
            trailing_slash,
        }
    }

    /// 라우트 등록 (시작 단계에서만)
    /// Register a binding. On error the table is left untouched.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        handler: H,
        name: impl Into<String>,
    ) -> Result<(), RouteError> {
        let path = path.into();
        let name = name.into();

        // 1. 패턴 검증
        validate_pattern(&path)?;

        // 2. 중복 검사 (모든 검사가 끝난 뒤에만 변경)
        if self.by_name.contains_key(&name) {
            return Err(RouteError::DuplicateName { name });
        }
        if self.by_path.contains_key(&path) {
            return Err(RouteError::DuplicatePath { path });
        }

        // 3. 추가
        let index = self.routes.len();
        self.by_path.insert(path.clone(), index);
        self.by_name.insert(name.clone(), index);
        self.routes.push(Route { path, name, handler });

        Ok(())
    }

    /// 요청 경로로 핸들러 조회
    /// Look up the handler for a request path
    pub fn resolve(&self, request_path: &str) -> Result<Resolved<'_, H>, RouteError> {
        if let Some(&index) = self.by_path.get(request_path) {
            return Ok(Resolved::Handler(&self.routes[index].handler));
        }

        if self.trailing_slash == TrailingSlash::Redirect {
            let alternate = match request_path.strip_suffix('/') {
                Some(stripped) => stripped.to_string(),
                None => format!("{}/", request_path),
            };
            if let Some(&index) = self.by_path.get(&alternate) {
                return Ok(Resolved::Redirect(&self.routes[index].path));
            }
        }

        Err(RouteError::NoMatch {
            path: request_path.to_string(),
        })
    }

    /// 이름으로 경로 역산
    /// Reverse a route name into its concrete path
    pub fn reverse(&self, name: &str) -> Result<&str, RouteError> {
        self.by_name
            .get(name)
            .map(|&index| self.routes[index].path.as_str())
            .ok_or_else(|| RouteError::UnknownRouteName {
                name: name.to_string(),
            })
    }

    /// 등록 순서대로 순회
    /// Iterate in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Route<H>> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn trailing_slash(&self) -> TrailingSlash {
        self.trailing_slash
    }
}

fn validate_pattern(path: &str) -> Result<(), RouteError> {
    let invalid = |reason| RouteError::InvalidPattern {
        path: path.to_string(),
        reason,
    };

    if !path.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }
    if !path.ends_with('/') {
        return Err(invalid("must end with '/'"));
    }
    if path.contains("//") {
        return Err(invalid("empty path segment"));
    }
    if path.contains(['{', '}', ':', '*']) {
        return Err(invalid("dynamic segments are not supported"));
    }

    Ok(())
}
