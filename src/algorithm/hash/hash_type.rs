/// 密钥交换对应的hash算法
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HashType {
    SHA1,
    SHA256,
}
