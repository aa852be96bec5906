// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::url_utils::{hostname_of, resolve_url};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::{ParseError, Url};

/// 跟随链接请求
///
/// 页面解析阶段发现的待跟随链接。主机名在第一次查询时解析并缓存在请求上，
/// URL 只能通过 [`FollowRequest::set_url`] 修改，修改时缓存随之失效。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowRequest {
    /// 目标URL
    url: String,
    /// 是否跳过作用域检查
    #[serde(default)]
    pub bypass_scope: bool,
    #[serde(skip)]
    hostname: OnceCell<String>,
}

impl FollowRequest {
    /// 创建新的跟随请求
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bypass_scope: false,
            hostname: OnceCell::new(),
        }
    }

    /// 创建一个始终放行的请求（例如宿主已审核过的重定向）
    pub fn bypassing_scope(url: impl Into<String>) -> Self {
        Self::new(url).with_bypass_scope(true)
    }

    /// 基于页面URL解析链接，生成跟随请求
    ///
    /// # 参数
    ///
    /// * `base` - 当前页面的URL
    /// * `href` - 页面中发现的链接，可以是相对路径
    ///
    /// # 返回值
    ///
    /// * `Ok(FollowRequest)` - 解析后的绝对URL请求
    /// * `Err(ParseError)` - 链接无法解析
    pub fn from_link(base: &Url, href: &str) -> Result<Self, ParseError> {
        Ok(Self::new(resolve_url(base, href)?.to_string()))
    }

    /// 目标URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// 更换目标URL，并丢弃已缓存的主机名
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
        self.hostname = OnceCell::new();
    }

    /// 设置是否跳过作用域检查
    pub fn with_bypass_scope(mut self, bypass: bool) -> Self {
        self.bypass_scope = bypass;
        self
    }

    /// 目标URL的主机名，无法解析时为空字符串
    pub fn hostname(&self) -> &str {
        self.hostname
            .get_or_init(|| hostname_of(&self.url).unwrap_or_default())
    }
}

impl PartialEq for FollowRequest {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url && self.bypass_scope == other.bypass_scope
    }
}

impl Eq for FollowRequest {}

impl fmt::Display for FollowRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<GET {}>", self.url)
    }
}

/// 页面处理产生的输出项
///
/// 要么是跟随请求，要么是作用域过滤器不检查的其他数据项
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpiderOutput<I> {
    /// 跟随链接请求
    Request(FollowRequest),
    /// 其他数据项，原样透传
    Item(I),
}

impl<I> SpiderOutput<I> {
    /// 如果是请求则返回请求引用
    pub fn as_request(&self) -> Option<&FollowRequest> {
        match self {
            SpiderOutput::Request(request) => Some(request),
            SpiderOutput::Item(_) => None,
        }
    }
}

impl<I> From<FollowRequest> for SpiderOutput<I> {
    fn from(request: FollowRequest) -> Self {
        SpiderOutput::Request(request)
    }
}
