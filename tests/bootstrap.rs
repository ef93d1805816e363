//! End-to-end bootstrap scenarios over the shipped parameter sets.

use tfhe_fdfb::prelude::*;

fn full_domain_function(p: u64) -> impl Fn(u64) -> u64 {
    move |x| ((18i64 - 3 * x as i64).rem_euclid(p as i64)) as u64
}

#[test]
fn identity_bootstrap() {
    let params = PARAMS_EBS_5.compile();
    let mut encryptor = Encryptor::new(params);
    let mut evaluator = Evaluator::new(params, &encryptor.gen_evaluation_key_parallel());

    let ct = encryptor.encrypt_lwe(7);
    let ct_out = evaluator.bootstrap_func(&ct, |x| x);
    assert_eq!(encryptor.decrypt_lwe(&ct_out), 7);
}

#[test]
fn classical_fdfb_evaluates_the_full_domain() {
    let params = PARAMS_EBS_5.compile();
    let mut encryptor = Encryptor::new(params);
    let mut evaluator = Evaluator::new(params, &encryptor.gen_evaluation_key_parallel());

    let mut compress_lut = evaluator.new_lookup_table();
    generate_extended_compress_lut_assign(&params, &mut compress_lut);

    let mut fdfb_lut = evaluator.new_lookup_table();
    generate_extended_fdfb_lut_assign(
        &params,
        full_domain_function(params.message_modulus().0),
        &mut fdfb_lut,
    );

    let ct = encryptor.encrypt_lwe(5);
    let ct_out = evaluator.fdfb_lut(&ct, &compress_lut, &fdfb_lut);
    assert_eq!(encryptor.decrypt_lwe(&ct_out), 3);
}

#[test]
fn recursive_fdfb_over_extended_tables() {
    let params = PARAMS_EBS_5.compile();
    let mut encryptor = Encryptor::new(params);
    let mut evaluator = Evaluator::new(params, &encryptor.gen_evaluation_key_parallel());

    let mut decomposed_lut = new_decomposed_lut_ebs(&params);
    generate_neg_decomposed_lut_ebs_assign(
        &params,
        full_domain_function(params.message_modulus().0),
        params.message_modulus(),
        params.scale(),
        &mut decomposed_lut,
    );
    let compress_lut = generate_compress_lut(&params);

    let ct = encryptor.encrypt_lwe(5);
    let ct_out = evaluator.bootstrap_extended_full_domain(&ct, &compress_lut, &decomposed_lut);
    assert_eq!(encryptor.decrypt_lwe(&ct_out), 3);
}

#[test]
fn recursive_fdfb_over_the_hierarchy() {
    let params = PARAMS_5.compile();
    let p = params.message_modulus().0;

    let mut encryptors = Encryptor::<u64>::new_hierarchy(params);
    let mut evaluators: Vec<Evaluator<u64>> = Vec::with_capacity(encryptors.len());
    for (depth, encryptor) in encryptors.iter_mut().enumerate() {
        let evaluation_key = encryptor.gen_evaluation_key_parallel();
        evaluators.push(Evaluator::new_hierarchy(params, &evaluation_key, depth + 1));
    }

    // the tables are derived from the full-size geometry
    let mut decomposed_lut = new_decomposed_lut(&params);
    generate_neg_decomposed_lut_assign(
        &params,
        |x| (13 + x) % p,
        params.message_modulus(),
        params.scale(),
        &mut decomposed_lut,
    );
    let deepest = evaluators.last().unwrap().parameters;
    let mut compress_lut = LookupTable::new(&deepest);
    generate_compress_lut_assign(&deepest, &mut compress_lut);

    let ms_constant = params.mod_switch_constant();

    let ct = encryptors[0].encrypt_lwe(1);
    let mut ct_out = encryptors[0].encrypt_lwe(0);

    for (depth, evaluator) in evaluators.iter_mut().enumerate() {
        let stage = evaluator.bootstrap_lut_with_constant(&ct, &decomposed_lut[depth], ms_constant);
        slice_add_assign(&mut ct_out, &stage);
    }
    let last = evaluators.last_mut().unwrap();
    let ct_compress =
        last.bootstrap_lut_with_constant(&ct, &compress_lut, ms_constant * 2.0);
    let base = last.bootstrap_lut(&ct_compress, decomposed_lut.last().unwrap());
    slice_add_assign(&mut ct_out, &base);

    assert_eq!(encryptors[0].decrypt_lwe(&ct_out), 14);
}

fn slice_add_assign(out: &mut LweCiphertextOwned<u64>, rhs: &LweCiphertextOwned<u64>) {
    for (out, &rhs) in out.as_mut().iter_mut().zip(rhs.as_ref()) {
        *out = out.wrapping_add(rhs);
    }
}

#[test]
fn evaluation_key_serialization_round_trip() {
    let params = PARAMS_EBS_5.compile();
    let mut encryptor = Encryptor::new(params);
    let evaluation_key = encryptor.gen_evaluation_key_parallel();

    let bytes = bincode::serialize(&evaluation_key).unwrap();
    let read: EvaluationKey<u64> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(read, evaluation_key);

    // the secret key and a ciphertext survive the same treatment
    let bytes = bincode::serialize(&encryptor.secret_key).unwrap();
    let read_key: SecretKey<u64> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(read_key, encryptor.secret_key);

    let ct = encryptor.encrypt_lwe(11);
    let bytes = bincode::serialize(&ct).unwrap();
    let read: LweCiphertextOwned<u64> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(read, ct);
    assert_eq!(encryptor.decrypt_lwe(&read), 11);

    // and a bootstrap through the deserialized key still decrypts correctly
    let mut evaluator = Evaluator::new(params, &read_key_roundtrip(&evaluation_key));
    let ct_out = evaluator.bootstrap_func(&ct, |x| (x + 2) % 16);
    assert_eq!(encryptor.decrypt_lwe(&ct_out), 13);
}

fn read_key_roundtrip(key: &EvaluationKey<u64>) -> EvaluationKey<u64> {
    bincode::deserialize(&bincode::serialize(key).unwrap()).unwrap()
}
