use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use domain::{ActorId, AppError};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::net::{IpAddr, SocketAddr};

use crate::http::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

/// 来源地址 -> 匿名指纹。纯函数,原始地址不落任何持久状态
#[derive(Clone)]
pub struct ActorResolver {
    salt: String,
}

impl ActorResolver {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    pub fn resolve(&self, origin: IpAddr) -> ActorId {
        // IPv4 统一映射到 16 字节形式,同一来源的两种写法得到同一身份
        let bytes = match origin {
            IpAddr::V4(v4) => v4.to_ipv6_mapped().octets(),
            IpAddr::V6(v6) => v6.octets(),
        };
        let mut mac = HmacSha256::new_from_slice(self.salt.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(&bytes);
        ActorId::new(hex::encode(mac.finalize().into_bytes()))
    }
}

/// 来源缺失时拒绝请求,绝不退到共享占位身份
pub struct ClientIp(pub IpAddr);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(value) = parts.headers.get("x-forwarded-for") {
            let parsed = value
                .to_str()
                .ok()
                .and_then(|raw| raw.split(',').next())
                .and_then(|first| first.trim().parse::<IpAddr>().ok());
            return match parsed {
                Some(ip) => Ok(ClientIp(ip)),
                None => Err(AppError::validation("client address could not be determined").into()),
            };
        }

        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            return Ok(ClientIp(addr.ip()));
        }

        Err(AppError::validation("client address could not be determined").into())
    }
}
