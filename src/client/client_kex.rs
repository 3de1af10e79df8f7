use tracing::*;

use crate::{
    algorithm::{
        hash::{self, HashCtx, Keys},
        key_exchange::{self, KeyExchange},
        public_key::{self, PublicKey},
    },
    client::{Client, KexState},
    config::{algorithm::AlgList, version::SshVersion},
    constant::ssh_msg_code,
    error::{SshError, SshResult},
    known_hosts::{HostVerifier, TrustDecision},
    model::{Data, Transport},
};

impl Client {
    /// Run one complete key exchange over `transport`.
    ///
    /// Callable from `Idle` (first handshake) and from
    /// `NewKeysExchanged` (re-key). The first exchange latches the
    /// session identifier; re-keys reuse it while producing fresh
    /// per-direction keys. Every failure is fatal for the connection
    /// and leaves the state machine in `Failed`.
    pub fn key_agreement<T>(
        &mut self,
        transport: &mut T,
        verifier: &mut HostVerifier,
    ) -> SshResult<()>
    where
        T: Transport,
    {
        match self.kex_state {
            KexState::Idle | KexState::NewKeysExchanged => self.kex_state = KexState::Idle,
            state => {
                return Err(SshError::ProtocolError(format!(
                    "key exchange started in state {:?}",
                    state
                )))
            }
        }

        let result = self.run_kex(transport, verifier);
        if result.is_err() {
            self.kex_state = KexState::Failed;
        }
        result
    }

    fn run_kex<T>(&mut self, transport: &mut T, verifier: &mut HostVerifier) -> SshResult<()>
    where
        T: Transport,
    {
        // initialize the hash context
        let mut hash_ctx = HashCtx::new();
        self.config.ver.validate()?;
        if let SshVersion::V2(ref our, ref their) = self.config.ver {
            hash_ctx.set_v_c(our);
            hash_ctx.set_v_s(their);
        }

        info!("start for key negotiation.");
        info!("send client algorithm list.");

        let client_kexinit = self.config.algs.pack();
        hash_ctx.set_i_c(&client_kexinit);
        transport.send(client_kexinit)?;

        // a KEXINIT the session already pulled off the wire wins over a
        // fresh read
        let server_kexinit = match self.buffered.take() {
            Some(pkt) => pkt,
            None => transport.recv(self.config.timeout)?,
        };
        hash_ctx.set_i_s(&server_kexinit);
        let server_algs = AlgList::unpack(server_kexinit)?;
        self.kex_state = KexState::KexInitExchanged;

        let negotiated = self.config.algs.match_with(&server_algs)?;
        self.kex_state = KexState::NegotiationComplete;

        // key exchange algorithm
        let key_exchange = key_exchange::from(negotiated.key_exchange.0[0])?;
        self.send_qc(transport, key_exchange.get_public_key())?;
        hash_ctx.set_e(key_exchange.get_public_key());
        self.kex_state = KexState::DhInitSent;

        // an announced wrong guess is one packet to silently discard
        if server_algs.first_kex_packet_follows && !server_algs.guessed_right(&negotiated) {
            info!("discarding the server's guessed kex packet.");
            transport.recv(self.config.timeout)?;
        }

        // host key algorithm
        let public_key = public_key::from(negotiated.public_key.0[0]);

        // generate session id
        let session_id = {
            let session_id = self.verify_signature_and_new_keys(
                transport,
                verifier,
                negotiated.public_key.0[0].as_ref(),
                public_key.as_ref(),
                key_exchange.as_ref(),
                &mut hash_ctx,
            )?;

            if self.session_id.is_empty() {
                session_id
            } else {
                self.session_id.clone()
            }
        };

        let keys = Keys::new(hash_ctx, &session_id, key_exchange.get_hash_type());

        self.session_id = session_id;
        self.negotiated = negotiated;
        // parked for the session; taking them switches the cipher
        // contexts
        self.keys = Some(keys);

        info!("key negotiation successful.");

        Ok(())
    }

    /// Send the public key
    fn send_qc<T>(&mut self, transport: &mut T, public_key: &[u8]) -> SshResult<()>
    where
        T: Transport,
    {
        let mut data = Data::new();
        data.put_u8(ssh_msg_code::SSH_MSG_KEXDH_INIT)
            .put_mpint(public_key);
        transport.send(data)
    }

    fn verify_signature_and_new_keys<T>(
        &mut self,
        transport: &mut T,
        verifier: &mut HostVerifier,
        hostkey_algo: &str,
        public_key: &dyn PublicKey,
        key_exchange: &dyn KeyExchange,
        h: &mut HashCtx,
    ) -> SshResult<Vec<u8>>
    where
        T: Transport,
    {
        let mut session_id = vec![];
        loop {
            let mut data = transport.recv(self.config.timeout)?;
            let message_code = data.get_u8();
            match message_code {
                ssh_msg_code::SSH_MSG_KEXDH_REPLY => {
                    if self.kex_state != KexState::DhInitSent {
                        return Err(SshError::ProtocolError(
                            "KEXDH_REPLY arrived out of order".to_string(),
                        ));
                    }

                    // K_S, the server's host key blob; trust it before
                    // anything derived from it is accepted
                    let ks = data.get_u8s();
                    match verifier.verify(hostkey_algo, &ks)? {
                        TrustDecision::Trusted => {}
                        TrustDecision::Mismatched => {
                            return Err(SshError::HostKeyMismatch(verifier.host().to_string()))
                        }
                        _ => return Err(SshError::HostKeyRejected),
                    }
                    h.set_k_s(&ks);

                    // f, the server's exchange value; range-checked by
                    // the engine before K is computed
                    let f = data.get_mpint();
                    let k = key_exchange.get_shared_secret(&f)?;
                    h.set_f(&f);
                    h.set_k(&k);

                    session_id = hash::digest(&h.as_bytes(), key_exchange.get_hash_type());

                    // 验签
                    let mut sig_blob = Data::from(data.get_u8s());
                    sig_blob.get_u8s();
                    let signature = sig_blob.get_u8s();
                    let flag = public_key.verify_signature(&ks, &session_id, &signature)?;
                    if !flag {
                        error!("signature verification failure.");
                        return Err(SshError::InvalidSignature);
                    }
                    info!("signature verification success.");
                    self.kex_state = KexState::DhReplyVerified;
                }
                ssh_msg_code::SSH_MSG_NEWKEYS => {
                    if self.kex_state != KexState::DhReplyVerified {
                        return Err(SshError::ProtocolError(
                            "NEWKEYS before the DH reply was verified".to_string(),
                        ));
                    }
                    self.new_keys(transport)?;
                    self.kex_state = KexState::NewKeysExchanged;
                    return Ok(session_id);
                }
                ssh_msg_code::SSH_MSG_IGNORE | ssh_msg_code::SSH_MSG_DEBUG => {
                    debug!("skipping message code {} during key exchange", message_code);
                }
                x => {
                    return Err(SshError::ProtocolError(format!(
                        "unexpected message code {} during key exchange",
                        x
                    )))
                }
            }
        }
    }

    /// SSH_MSG_NEWKEYS 代表密钥交换完成
    fn new_keys<T>(&mut self, transport: &mut T) -> SshResult<()>
    where
        T: Transport,
    {
        let mut data = Data::new();
        data.put_u8(ssh_msg_code::SSH_MSG_NEWKEYS);
        info!("send new keys");
        transport.send(data)
    }
}
