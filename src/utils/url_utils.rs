// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{Host, ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 提取URL中的主机名
///
/// 无法解析或没有主机部分的URL（如 `javascript:` 伪链接）返回 `None`。
/// IPv6 地址不带方括号。主机名一律转为小写，包括非特殊 scheme 的主机。
pub fn hostname_of(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let hostname = match url.host()? {
        Host::Domain(domain) => domain.to_ascii_lowercase(),
        Host::Ipv4(addr) => addr.to_string(),
        Host::Ipv6(addr) => addr.to_string(),
    };
    (!hostname.is_empty()).then_some(hostname)
}
